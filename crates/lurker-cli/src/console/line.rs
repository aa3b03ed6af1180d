//! Console input syntax.
//!
//! Each line is one chat message, optionally prefixed with who says it and
//! whose last message it replies to:
//!
//! ```text
//! @42:alice /warn stop spamming     # user 42 (alice) sends a command
//! ^7:bob /ban                       # the current speaker replies to bob (7)
//! !rules                            # plain message from the current speaker
//! ```

use lurker_core::user::Identity;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// New speaker, if the line starts with `@id[:name]`.
    pub speaker: Option<Identity>,
    /// Author of the message being replied to, from `^id[:name]`.
    pub reply_to: Option<Identity>,
    /// The message text.
    pub text: String,
}

/// Parses one console line.
pub fn parse_line(line: &str) -> Result<ConsoleLine, String> {
    let mut rest = line.trim();

    let speaker = match rest.strip_prefix('@') {
        Some(spec) => {
            let (identity, tail) = take_identity(spec)?;
            rest = tail;
            Some(identity)
        }
        None => None,
    };

    let reply_to = match rest.strip_prefix('^') {
        Some(spec) => {
            let (identity, tail) = take_identity(spec)?;
            rest = tail;
            Some(identity)
        }
        None => None,
    };

    Ok(ConsoleLine {
        speaker,
        reply_to,
        text: rest.to_string(),
    })
}

/// Reads `id[:name]` up to the next whitespace. Without a name the id doubles
/// as the display name.
fn take_identity(spec: &str) -> Result<(Identity, &str), String> {
    let (token, tail) = match spec.find(char::is_whitespace) {
        Some(idx) => (&spec[..idx], spec[idx..].trim_start()),
        None => (spec, ""),
    };

    let (id, name) = match token.split_once(':') {
        Some((id, name)) if !name.is_empty() => (id, name),
        Some((id, _)) => (id, id),
        None => (token, token),
    };

    if id.is_empty() {
        return Err(format!("missing user id in '{}'", token));
    }

    Ok((Identity::new(id, name), tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let line = parse_line("  hello there ").unwrap();
        assert_eq!(line.speaker, None);
        assert_eq!(line.reply_to, None);
        assert_eq!(line.text, "hello there");
    }

    #[test]
    fn test_speaker_and_reply() {
        let line = parse_line("@1:mod ^2:troll /warn  be nice").unwrap();
        let speaker = line.speaker.unwrap();
        assert_eq!(speaker.id.as_str(), "1");
        assert_eq!(speaker.display_name, "mod");
        let target = line.reply_to.unwrap();
        assert_eq!(target.id.as_str(), "2");
        assert_eq!(target.display_name, "troll");
        assert_eq!(line.text, "/warn  be nice");
    }

    #[test]
    fn test_id_without_name() {
        let line = parse_line("^9 /user").unwrap();
        assert_eq!(line.speaker, None);
        assert_eq!(line.reply_to.unwrap().display_name, "9");
        assert_eq!(line.text, "/user");
    }

    #[test]
    fn test_speaker_only() {
        let line = parse_line("@5:alice").unwrap();
        assert_eq!(line.speaker.unwrap().display_name, "alice");
        assert!(line.text.is_empty());
    }

    #[test]
    fn test_missing_id_is_error() {
        assert!(parse_line("@ hello").is_err());
        assert!(parse_line("^:bob /ban").is_err());
    }
}
