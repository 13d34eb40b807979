//! Lock files guarding writes to the project directory
//!
//! A lock is a file created with `create_new`; whoever creates it owns the
//! lock until the guard is dropped and the file removed.

use crate::error::{DeskError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// How long to keep trying for a contended lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            retries: 50,
            retry_delay: Duration::from_millis(20),
        }
    }
}

/// Held lock; released on drop
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    pub fn acquire(path: impl Into<PathBuf>, options: &LockOptions) -> Result<Self> {
        let path = path.into();

        for attempt in 0..=options.retries {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Self::claim(path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(
                        "Lock {} is held, attempt {}/{}",
                        path.display(),
                        attempt + 1,
                        options.retries + 1
                    );
                    if attempt < options.retries {
                        thread::sleep(options.retry_delay);
                    }
                },
                Err(e) => return Err(e.into()),
            }
        }

        Err(DeskError::LockTimeout {
            resource: path.display().to_string(),
        })
    }

    /// Takes ownership of a freshly created lock file and records our pid;
    /// the file is removed again if the pid cannot be written
    fn claim(path: PathBuf, mut file: impl Write) -> Result<Self> {
        let lock = Self { path };
        writeln!(file, "{}", std::process::id())?;
        Ok(lock)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}
