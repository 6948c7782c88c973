//! Operator-facing progress: timestamped run log and desktop notifications.

pub mod notify;
pub mod reporter;

pub use notify::{DesktopNotifier, Notifier, NoopNotifier};
pub use reporter::{LOG_FILE_NAME, ProgressReporter, log_file_path};
