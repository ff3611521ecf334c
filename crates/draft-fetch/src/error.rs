//! Fetch error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request would push the month past its call cap. Nothing was sent.
    #[error("{provider} monthly cap reached ({used}/{max}); refusing new API call")]
    QuotaExceeded {
        provider: String,
        used: u32,
        max: u32,
    },

    #[error("{var} is not set; export it before using --execute")]
    MissingApiKey { var: &'static str },

    #[error("unknown dataset '{name}'; valid options: {valid}")]
    UnknownDataset { name: String, valid: String },

    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {target_path} with {temp_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl FetchError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether the pipeline can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FetchError::QuotaExceeded { .. } | FetchError::Network(_) | FetchError::Api { .. }
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
