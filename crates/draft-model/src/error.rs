use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown position: {raw:?}")]
    UnknownPosition { raw: String },
    #[error("invalid metric source label: {0:?}")]
    InvalidMetricSource(String),
    #[error("invalid height: {0:?}")]
    InvalidHeight(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
