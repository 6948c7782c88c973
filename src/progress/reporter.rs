//! Timestamped progress lines mirrored to stdout and a per-run log file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

/// Name of the run log inside the scratch directory.
pub const LOG_FILE_NAME: &str = "last-run.log";

/// Scratch directory under the git dir.
const SCRATCH_DIR: &str = "commit-blog";

/// `<git-dir>/commit-blog/last-run.log`
pub fn log_file_path(git_dir: &Path) -> PathBuf {
    git_dir.join(SCRATCH_DIR).join(LOG_FILE_NAME)
}

/// Writes one line per pipeline stage.
///
/// The log file is truncated when the reporter is created, so it only
/// ever holds the latest run. Failing to open or write it never fails
/// the run.
pub struct ProgressReporter {
    log: Option<File>,
    echo: bool,
}

impl ProgressReporter {
    /// Reporter that prints to stdout and logs to `log_path`.
    pub fn create(log_path: &Path) -> Self {
        Self {
            log: open_log(log_path),
            echo: true,
        }
    }

    /// Reporter that only logs to `log_path`.
    pub fn quiet(log_path: &Path) -> Self {
        Self {
            log: open_log(log_path),
            echo: false,
        }
    }

    /// Reporter that drops every line.
    pub fn disabled() -> Self {
        Self {
            log: None,
            echo: false,
        }
    }

    /// Record a stage transition.
    pub fn step(&self, message: impl AsRef<str>) {
        let line = format_line(&Local::now().format("%H:%M:%S").to_string(), message.as_ref());

        if self.echo {
            println!("{}", line);
        }

        if let Some(mut file) = self.log.as_ref()
            && let Err(e) = writeln!(file, "{}", line)
        {
            warn!("Failed to append to run log: {}", e);
        }
    }
}

fn format_line(timestamp: &str, message: &str) -> String {
    format!("[{}] {}", timestamp, message)
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create {}: {}", parent.display(), e);
        return None;
    }

    match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("Failed to open run log {}: {}", path.display(), e);
            None
        }
    }
}
