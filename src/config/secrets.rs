//! Provider secrets loaded once at startup.
//!
//! Secrets come from a `KEY=value` file in the install root and from the
//! process environment. They are collected into an explicit [`Secrets`]
//! value that the pipeline passes down, so nothing past this module reads
//! `std::env` for credentials.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

/// Environment variable that overrides the install root.
pub const INSTALL_ROOT_ENV: &str = "COMMIT_BLOG_HOME";

/// Name of the secrets file inside the install root.
pub const SECRETS_FILE_NAME: &str = ".env";

/// Directory holding the installed hook and its secrets file.
///
/// `$COMMIT_BLOG_HOME` if set, otherwise `~/.commit-blog`.
pub fn install_root() -> PathBuf {
    match env::var(INSTALL_ROOT_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".commit-blog"),
    }
}

/// Location of the secrets file.
pub fn secrets_file_path() -> PathBuf {
    install_root().join(SECRETS_FILE_NAME)
}

/// Provider API keys keyed by environment variable name.
#[derive(Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
    source: PathBuf,
}

impl Secrets {
    /// Load secrets from `path`, then overlay the named process environment
    /// variables.
    ///
    /// A missing file is not an error. Later lines in the file override
    /// earlier ones for the same key; a non-empty environment variable
    /// overrides the file.
    pub fn load(path: &Path, names: &[&str]) -> Result<Self, ConfigError> {
        let mut secrets = Self::from_file(path)?;

        for name in names {
            if let Ok(value) = env::var(name)
                && !value.is_empty()
            {
                debug!("Using {} from the environment", name);
                secrets.values.insert(name.to_string(), value);
            }
        }

        Ok(secrets)
    }

    /// Load secrets from `path` only.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        if path.is_file() {
            let iter = dotenv::from_path_iter(path).map_err(|source| ConfigError::SecretsFailed {
                path: path.to_path_buf(),
                source,
            })?;

            for item in iter {
                let (key, value) = item.map_err(|source| ConfigError::SecretsFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
                values.insert(key, value);
            }
            debug!("Loaded {} secret(s) from {}", values.len(), path.display());
        } else {
            debug!("No secrets file at {}", path.display());
        }

        Ok(Self {
            values,
            source: path.to_path_buf(),
        })
    }

    /// Build secrets from explicit pairs.
    pub fn from_pairs<I, K, V>(source: impl Into<PathBuf>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            source: source.into(),
        }
    }

    /// Value for `name`, or `None` when absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The secrets file these values were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

// Keys only; values never reach logs.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Secrets")
            .field("keys", &keys)
            .field("source", &self.source)
            .finish()
    }
}
