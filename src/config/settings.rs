//! Per-repository settings with a `.commit-blog.json` override file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Name of the repository-local override file, relative to the repo root.
pub const CONFIG_FILE_NAME: &str = ".commit-blog.json";

pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4-20250514";
pub const DEFAULT_OUTPUT_DIR: &str = "blogs";
pub const DEFAULT_MAX_DIFF_LINES: usize = 400;

/// Subjects matching any of these are never turned into posts.
pub const DEFAULT_SKIP_PATTERNS: [&str; 4] = [r"^Merge ", r"^WIP", r"^fixup! ", r"\[skip blog\]"];

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `<provider>/<model-name>`, e.g. `openai/gpt-4o`.
    pub model: String,
    /// Output directory, relative to the repository root.
    pub output_dir: String,
    /// Regexes searched (not full-matched) against the commit subject.
    pub skip_patterns: Vec<String>,
    /// Line budget for the diff sent to the provider.
    pub max_diff_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            skip_patterns: DEFAULT_SKIP_PATTERNS.iter().map(|p| p.to_string()).collect(),
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
        }
    }
}

/// On-disk shape of the override file. Every key is optional; unknown keys
/// are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOverride {
    model: Option<String>,
    output_dir: Option<String>,
    skip_patterns: Option<Vec<String>>,
    max_diff_lines: Option<usize>,
}

impl Config {
    /// Shallow merge: keys present in the override replace the default.
    fn merged(self, overrides: ConfigOverride) -> Self {
        Self {
            model: overrides.model.unwrap_or(self.model),
            output_dir: overrides.output_dir.unwrap_or(self.output_dir),
            skip_patterns: overrides.skip_patterns.unwrap_or(self.skip_patterns),
            max_diff_lines: overrides.max_diff_lines.unwrap_or(self.max_diff_lines),
        }
    }

    /// Absolute output directory for a repository rooted at `repo_root`.
    pub fn output_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.output_dir)
    }
}

/// Parse override JSON and merge it onto the defaults.
pub fn parse_config(raw: &str) -> Result<Config, serde_json::Error> {
    let overrides: ConfigOverride = serde_json::from_str(raw)?;
    Ok(Config::default().merged(overrides))
}

/// Load the configuration for the repository rooted at `repo_root`.
///
/// A missing override file yields the defaults. A file that exists but
/// cannot be read or parsed is an error, never silently ignored.
pub fn load_config(repo_root: &Path) -> Result<Config, ConfigError> {
    let path = repo_root.join(CONFIG_FILE_NAME);

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::ReadFailed { path, source }),
    };

    parse_config(&raw).map_err(|source| ConfigError::ParseFailed { path, source })
}
