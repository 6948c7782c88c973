//! commit-blog - turn the latest git commit into a narrative blog post.
//!
//! # Overview
//!
//! A post-commit hook runs the `commit-blog` binary. It reads the HEAD
//! commit, skips merges and other noise, sends the commit and a bounded
//! diff to an LLM provider (Anthropic, OpenAI, Google, xAI or DeepSeek)
//! and writes the returned markdown to `<outputDir>/<date>-<slug>.md`.
//! Failures can be retried interactively when a terminal is attached.

pub mod blog;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod pipeline;
pub mod progress;

// Re-export commonly used types
pub use commit::{SkipDecision, SkipReason};
pub use config::{Config, Secrets};
pub use error::{
    ConfigError, GenerationError, GitError, PipelineError, ProviderError, WriteError,
};
pub use git::CommitContext;
pub use llm::{ProviderKind, ProviderSpec, TextGenerator};
pub use pipeline::{Attempt, PipelineEnv, RunOutcome, run_with_retry};
