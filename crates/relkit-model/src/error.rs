use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown censoring status: {0}")]
    UnknownStatus(String),
    #[error("unknown aggregation mode: {0}")]
    UnknownMode(String),
    #[error("invalid unit identifier: {0:?}")]
    InvalidUnit(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
