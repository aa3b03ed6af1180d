//! Atomic text file operations.
//!
//! Provides a thin layer for crash-safe replacement of small files such as
//! the state snapshot.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic file operations.
#[derive(Debug, Error)]
pub enum AtomicFileError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The path cannot host a sibling temp file.
    #[error("Invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },
    /// File locking error.
    #[error("Lock error: {0}")]
    Lock(String),
    /// Another handle already holds the lock.
    #[error("{} is locked by another process", path.display())]
    Locked { path: PathBuf },
}

impl From<AtomicFileError> for lurker_core::LurkerError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => e.into(),
            other => lurker_core::LurkerError::io(other.to_string()),
        }
    }
}

/// A handle to a file that is only ever replaced as a whole.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: An optional exclusive lock for load-modify-save cycles
/// - **Durability**: Explicit fsync before rename
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    /// Creates a new atomic file handle.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: File contents, possibly empty
    /// - `Ok(None)`: File doesn't exist
    /// - `Err`: Failed to read the file
    pub fn load(&self) -> Result<Option<String>, AtomicFileError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the file contents atomically.
    ///
    /// The data goes to a hidden sibling temp file which is fsynced and then
    /// renamed over the target, so readers see either the old or the new
    /// contents but never a mix.
    pub fn save(&self, contents: &str) -> Result<(), AtomicFileError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(contents.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Acquires an exclusive lock guarding load-modify-save cycles.
    ///
    /// The lock lives on a sibling `.lock` file so the data file itself can
    /// still be replaced by rename while the lock is held.
    pub fn lock(&self) -> Result<FileLock, AtomicFileError> {
        FileLock::acquire(&self.path, true)
    }

    /// Like [`lock`](Self::lock), but fails with `Locked` instead of waiting
    /// when the lock is already held.
    pub fn try_lock(&self) -> Result<FileLock, AtomicFileError> {
        FileLock::acquire(&self.path, false)
    }

    /// Gets a temporary file path for atomic writes.
    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicFileError::InvalidPath {
                path: self.path.clone(),
                reason: "path has no file name",
            })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// A file lock guard that automatically releases the lock when dropped.
pub struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path, wait: bool) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            if wait {
                file.lock_exclusive()
                    .map_err(|e| AtomicFileError::Lock(format!("Failed to acquire lock: {}", e)))?;
            } else if let Err(e) = file.try_lock_exclusive() {
                if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                    return Err(AtomicFileError::Locked {
                        path: path.to_path_buf(),
                    });
                }
                return Err(AtomicFileError::Lock(format!("Failed to acquire lock: {}", e)));
            }
        }
        #[cfg(not(unix))]
        let _ = wait;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}
