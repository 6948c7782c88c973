//! Commit eligibility and diff shaping before generation.

pub mod skip;
pub mod truncate;

pub use skip::{SkipDecision, SkipReason, SkipRules};
pub use truncate::{TruncatedDiff, truncate_diff};
