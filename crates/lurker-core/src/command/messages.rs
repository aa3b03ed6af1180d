//! Notification texts shown to chat users.
//!
//! These strings are user-facing and kept stable; tests assert on them verbatim.

use crate::user::{Identity, UserId};

/// Reason attached to the automatic ban after the third warning.
pub const AUTO_BAN_REASON: &str = "The user got 3 warnings";

pub const BAN_STAFF_REFUSAL: &str = "You can't ban a staff member!";

pub const ADD_COMMAND_USAGE: &str = "Usage: /addcommand <name> <text>";

pub const HELP_TEXT: &str = "
/warn <reason> - Warns the user.
/unwarn - Removes the last warn from the user.
/nowarns - Clears warns for the user.
/ban <reason> - Bans the user from groups.
/unban - Removes the user from ban list.
/user - Shows user's status and warns.
/addcommand <name> - to create a custom command.
/removecommand <name> - to remove a custom command.

Commands for everyone:
/staff - Shows a list of admins.
/report - Reports the replied-to message to admins.
";

/// Formats a warning count the way notifications spell it.
///
/// Only 1 to 3 get a real suffix; everything above is `{n}th`, including
/// 21 or 22.
pub fn ordinal(count: usize) -> String {
    match count {
        0 => "no".to_string(),
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

pub fn not_staff(invoker: &Identity) -> String {
    format!(
        "{} ({}) is not staff and can't use this command!",
        invoker.display_name, invoker.id
    )
}

pub fn warned(target: &Identity, reason: &str, count: usize) -> String {
    format!(
        "@{}: {} (This is your {} warning!)",
        target.display_name,
        reason,
        ordinal(count)
    )
}

pub fn warnings_left(target: &Identity, count: usize) -> String {
    format!(
        "@{}: You have {} warnings now!",
        target.display_name,
        ordinal(count)
    )
}

pub fn warnings_cleared(target: &Identity) -> String {
    warnings_left(target, 0)
}

pub fn banned(target: &Identity, reason: &str) -> String {
    format!("@{} was banned: {}", target.display_name, reason)
}

pub fn unbanned(target: &Identity) -> String {
    format!("@{} was unbanned!", target.display_name)
}

/// Builds the multi-line status report for `target`.
pub fn user_status(target: &Identity, is_banned: bool, warnings: &[String]) -> String {
    let mut msg = format!("Status for @{} ({}):\n", target.display_name, target.id);
    if is_banned {
        msg.push_str("\tUser is BANNED!\n");
    }
    for (idx, warning) in warnings.iter().enumerate() {
        msg.push_str(&format!("\tWarning #{}: {}\n", idx + 1, warning));
    }
    msg
}

pub const STAFF_HEADER: &str = "List of staff:\n";

pub fn staff_line(display_name: &str) -> String {
    format!("@{display_name}\n")
}

pub fn staff_missing_line(id: &UserId) -> String {
    format!("{id} (not in this chat)\n")
}

pub fn reported(reporter: &Identity, chat_title: &str) -> String {
    format!(
        "Message was reported by {} in {}!",
        reporter.display_name, chat_title
    )
}

pub fn custom_command_defined(token: &str, text: &str) -> String {
    format!("New custom command {token} defined: {text}")
}

pub fn custom_command_removed(token: &str) -> String {
    format!("Command {token} removed!")
}

pub fn custom_command_not_found(token: &str) -> String {
    format!("Command {token} not found!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_mapping() {
        assert_eq!(ordinal(0), "no");
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(21), "21th");
        assert_eq!(ordinal(22), "22th");
    }

    #[test]
    fn test_user_status_without_records() {
        let target = Identity::new("5", "alice");
        assert_eq!(user_status(&target, false, &[]), "Status for @alice (5):\n");
    }

    #[test]
    fn test_user_status_lists_ban_then_warnings() {
        let target = Identity::new("5", "alice");
        let warnings = vec!["spam".to_string(), "flood".to_string()];
        assert_eq!(
            user_status(&target, true, &warnings),
            "Status for @alice (5):\n\tUser is BANNED!\n\tWarning #1: spam\n\tWarning #2: flood\n"
        );
    }

    #[test]
    fn test_denial_names_invoker() {
        let invoker = Identity::new("12", "mallory");
        assert_eq!(
            not_staff(&invoker),
            "mallory (12) is not staff and can't use this command!"
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        for token in [
            "/warn", "/unwarn", "/nowarns", "/ban", "/unban", "/user", "/addcommand",
            "/removecommand", "/staff", "/report",
        ] {
            assert!(HELP_TEXT.contains(token), "help text misses {token}");
        }
    }
}
