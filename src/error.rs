//! Error types for commit-blog modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading configuration and secrets.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid skip pattern '{pattern}': {source}")]
    InvalidSkipPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Failed to read secrets file {}: {source}", path.display())]
    SecretsFailed {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {}: {source}", path.display())]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Repository at {} is bare; commit-blog needs a working tree", path.display())]
    BareRepository { path: PathBuf },
}

/// Errors from resolving the configured model to a provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid model format '{0}': expected \"<provider>/<model-name>\"")]
    InvalidModelFormat(String),

    #[error("Unknown provider '{provider}'. Supported providers: {supported}")]
    UnknownProvider { provider: String, supported: String },

    #[error(
        "{var} is not set. Add {var}=<key> to {} or export it in your shell",
        secrets_file.display()
    )]
    MissingSecret {
        var: &'static str,
        secrets_file: PathBuf,
    },
}

/// Errors from calling a generation provider.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{provider} authentication failed: {message}")]
    AuthFailed { provider: String, message: String },

    #[error("{provider} rate limit exceeded: {message}")]
    RateLimited { provider: String, message: String },

    #[error("{provider} request failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Could not reach {provider}: {message}")]
    Network { provider: String, message: String },

    #[error("{provider} returned an unusable response: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Errors from persisting the generated post.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a single pipeline attempt.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl PipelineError {
    /// Whether an operator may retry the run after this failure.
    ///
    /// Malformed configuration and repository failures are fatal. Provider
    /// resolution, generation and write failures can all be fixed outside
    /// the process (set the secret, fix the model string, free disk space)
    /// and then retried.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PipelineError::Config(_) | PipelineError::Git(_) => false,
            PipelineError::Provider(_)
            | PipelineError::Generation(_)
            | PipelineError::Write(_) => true,
        }
    }
}
