//! Decide whether a commit deserves a post.

use std::fmt;

use regex_lite::Regex;

use crate::error::ConfigError;

/// Why a commit was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The subject matched this configured pattern.
    MatchedPattern(String),
    /// The commit carries no diff (root commit or empty commit).
    EmptyDiff,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MatchedPattern(pattern) => {
                write!(f, "subject matches skip pattern '{}'", pattern)
            }
            SkipReason::EmptyDiff => write!(f, "commit has no diff"),
        }
    }
}

/// Outcome of evaluating a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDecision {
    Proceed,
    Skip(SkipReason),
}

/// Compiled skip patterns.
#[derive(Debug, Clone)]
pub struct SkipRules {
    patterns: Vec<Regex>,
}

impl SkipRules {
    /// Compile the configured patterns, failing on the first invalid one.
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidSkipPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Skip when the subject matches any pattern (search, case-sensitive)
    /// or when the diff is empty.
    pub fn evaluate(&self, subject: &str, diff: &str) -> SkipDecision {
        if let Some(re) = self.patterns.iter().find(|re| re.is_match(subject)) {
            return SkipDecision::Skip(SkipReason::MatchedPattern(re.as_str().to_string()));
        }

        if diff.trim().is_empty() {
            return SkipDecision::Skip(SkipReason::EmptyDiff);
        }

        SkipDecision::Proceed
    }
}
