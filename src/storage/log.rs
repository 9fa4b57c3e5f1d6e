//! Activity log
//!
//! Transitions, sweeps, and skipped documents are appended to a
//! timestamped log file under the vault state directory. Logging is
//! best-effort: a failure to log never fails the operation being logged.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Maximum log file size before rotation (1MB)
const MAX_LOG_SIZE: u64 = 1024 * 1024;

/// Number of rotated log files to keep
const LOG_ROTATION_COUNT: usize = 7;

/// Append-only activity log with size-based rotation
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    /// Creates a log writing to the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a timestamped message, swallowing any I/O failure
    pub fn record(&self, message: &str) {
        let _ = self.try_record(message);
    }

    fn try_record(&self, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        rotate_if_needed(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file: {}", self.path.display()))?;

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] {}", timestamp, message)?;

        Ok(())
    }
}

/// Rotates log files if the current log exceeds MAX_LOG_SIZE
fn rotate_if_needed(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let metadata = fs::metadata(log_path)?;
    if metadata.len() < MAX_LOG_SIZE {
        return Ok(());
    }

    // Shift numbered logs up, dropping the oldest
    for i in (1..LOG_ROTATION_COUNT).rev() {
        let old_path = log_path.with_extension(format!("log.{}", i));
        let new_path = log_path.with_extension(format!("log.{}", i + 1));
        if old_path.exists() {
            if i + 1 >= LOG_ROTATION_COUNT {
                fs::remove_file(&old_path)?;
            } else {
                fs::rename(&old_path, &new_path)?;
            }
        }
    }

    let rotated_path = log_path.with_extension("log.1");
    fs::rename(log_path, rotated_path)?;

    Ok(())
}
