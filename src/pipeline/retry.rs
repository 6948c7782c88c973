//! Operator-driven retry loop around pipeline attempts.
//!
//! ```text
//! Running --ok--> Success
//! Running --err--> Failed --interactive & recoverable--> Prompt --yes--> Running
//!                         \                                     \--no--> Aborted
//!                          \--otherwise--> Aborted
//! ```
//!
//! There is no retry limit and no automatic retry.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::Confirm;
use tracing::debug;

use crate::commit::SkipReason;
use crate::error::PipelineError;
use crate::progress::{Notifier, ProgressReporter};

use super::run_once::{Attempt, AttemptRunner};

/// Title used for desktop notifications.
const NOTIFY_TITLE: &str = "commit-blog";

/// States of the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Running,
    Success,
    Failed,
    Prompt,
    Aborted,
}

/// Inputs that move the loop between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEvent {
    AttemptSucceeded,
    AttemptFailed,
    /// Whether the failure may be offered for retry.
    FailureTriaged { can_prompt: bool },
    OperatorDecided { retry: bool },
}

impl RetryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RetryState::Success | RetryState::Aborted)
    }

    /// Apply `event`. Events that do not apply to the current state leave
    /// it unchanged.
    pub fn next(self, event: RetryEvent) -> RetryState {
        use RetryEvent::*;
        use RetryState::*;

        match (self, event) {
            (Running, AttemptSucceeded) => Success,
            (Running, AttemptFailed) => Failed,
            (Failed, FailureTriaged { can_prompt: true }) => Prompt,
            (Failed, FailureTriaged { can_prompt: false }) => Aborted,
            (Prompt, OperatorDecided { retry: true }) => Running,
            (Prompt, OperatorDecided { retry: false }) => Aborted,
            (state, _) => state,
        }
    }
}

/// Asks the operator whether to try again.
#[cfg_attr(test, mockall::automock)]
pub trait RetryPrompter: Send + Sync {
    /// Whether an operator is attached to answer.
    fn is_interactive(&self) -> bool;

    /// Show `failure` and ask whether to retry.
    fn confirm_retry(&self, failure: &str) -> bool;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl RetryPrompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
    }

    fn confirm_retry(&self, failure: &str) -> bool {
        eprintln!();
        eprintln!("Blog generation failed: {}", failure);
        Confirm::new()
            .with_prompt("Fix the problem and retry?")
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

/// Never interactive; every failure aborts.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPrompter;

impl RetryPrompter for HeadlessPrompter {
    fn is_interactive(&self) -> bool {
        false
    }

    fn confirm_retry(&self, _failure: &str) -> bool {
        false
    }
}

/// Final result of an invocation.
#[derive(Debug)]
pub enum RunOutcome {
    Written(PathBuf),
    Skipped(SkipReason),
    Aborted(PipelineError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Aborted(_))
    }

    /// Process exit code: 0 for a written or skipped post, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

impl From<Attempt> for RunOutcome {
    fn from(attempt: Attempt) -> Self {
        match attempt {
            Attempt::Written(path) => RunOutcome::Written(path),
            Attempt::Skipped(reason) => RunOutcome::Skipped(reason),
        }
    }
}

/// Run attempts until one succeeds or the operator gives up.
///
/// Fatal errors (configuration, repository) and headless runs abort after
/// the first failure. Every terminal outcome sends one desktop notification.
pub async fn run_with_retry(
    runner: &dyn AttemptRunner,
    prompter: &dyn RetryPrompter,
    notifier: &dyn Notifier,
    reporter: &ProgressReporter,
) -> RunOutcome {
    let mut state = RetryState::Running;
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        if attempts > 1 {
            reporter.step(format!("Retrying (attempt {})", attempts));
        }

        let outcome = match runner.run_attempt(reporter).await {
            Ok(attempt) => {
                state = state.next(RetryEvent::AttemptSucceeded);
                RunOutcome::from(attempt)
            }
            Err(error) => {
                state = state.next(RetryEvent::AttemptFailed);
                reporter.step(format!("Failed: {}", error));

                let can_prompt = error.is_recoverable() && prompter.is_interactive();
                state = state.next(RetryEvent::FailureTriaged { can_prompt });

                if state == RetryState::Prompt {
                    let retry = prompter.confirm_retry(&error.to_string());
                    state = state.next(RetryEvent::OperatorDecided { retry });
                }

                if state == RetryState::Aborted {
                    reporter.step("Aborted");
                }
                RunOutcome::Aborted(error)
            }
        };

        debug!("Attempt {} finished in state {:?}", attempts, state);
        if state.is_terminal() {
            return finish(outcome, notifier);
        }
    }
}

fn finish(outcome: RunOutcome, notifier: &dyn Notifier) -> RunOutcome {
    match &outcome {
        RunOutcome::Written(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            notifier.notify(NOTIFY_TITLE, &format!("Blog post written: {}", name));
        }
        RunOutcome::Aborted(error) => {
            notifier.notify(NOTIFY_TITLE, &format!("Blog post failed: {}", error));
        }
        RunOutcome::Skipped(reason) => {
            notifier.notify(NOTIFY_TITLE, &format!("Blog post skipped: {}", reason));
        }
    }
    outcome
}
