//! The post-commit pipeline and the retry loop that drives it.

pub mod retry;
pub mod run_once;

pub use retry::{
    HeadlessPrompter, RetryEvent, RetryPrompter, RetryState, RunOutcome, TerminalPrompter,
    run_with_retry,
};
pub use run_once::{Attempt, AttemptRunner, PipelineEnv, run_once};
