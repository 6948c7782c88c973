//! Best-effort desktop notifications.

use std::process::{Command, Stdio};

use tracing::debug;

/// Fire-and-forget notification channel.
///
/// Implementations must never fail the caller: delivery problems are
/// logged and dropped.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Sends notifications through the platform's command-line notifier.
///
/// `osascript` on macOS, `notify-send` elsewhere. When the tool is not on
/// `PATH` nothing happens.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let (program, args) = notification_command(title, message);

        if which::which(program).is_err() {
            debug!("{} not found, skipping notification", program);
            return;
        }

        let spawned = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        if let Err(e) = spawned {
            debug!("Failed to send notification via {}: {}", program, e);
        }
    }
}

/// Swallows every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

fn notification_command(title: &str, message: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            applescript_escape(message),
            applescript_escape(title)
        );
        ("osascript", vec!["-e".to_string(), script])
    } else {
        ("notify-send", vec![title.to_string(), message.to_string()])
    }
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
