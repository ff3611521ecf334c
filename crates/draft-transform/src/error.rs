use thiserror::Error;

use draft_model::Position;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("no {table} entry for position {position}")]
    MissingStandard {
        table: &'static str,
        position: Position,
    },
    #[error("round map is empty")]
    EmptyRoundMap,
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;
