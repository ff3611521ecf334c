#![deny(unsafe_code)]

use std::path::PathBuf;

use draft_model::Position;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("{table} is missing position {position}")]
    MissingPosition {
        table: &'static str,
        position: Position,
    },

    #[error("weights for {position} sum to {sum:.6}, expected {expected:.6}")]
    WeightSum {
        position: Position,
        sum: f64,
        expected: f64,
    },

    #[error("negative weight for {position}: {component}")]
    NegativeWeight {
        position: Position,
        component: &'static str,
    },

    #[error("alias {alias:?} targets unknown position {target:?}")]
    InvalidAlias { alias: String, target: String },

    #[error("alias {alias:?} maps to both {first} and {second}")]
    ConflictingAlias {
        alias: String,
        first: Position,
        second: Position,
    },

    #[error("invalid setting: {message}")]
    InvalidSetting { message: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
