//! Store error types.

use relkit_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored label no longer maps onto the model.
    #[error("invalid value in {table}.{column}")]
    Model {
        table: &'static str,
        column: &'static str,
        #[source]
        source: ModelError,
    },

    /// An integer column does not fit the model type.
    #[error("value {value} in {table}.{column} is out of range")]
    OutOfRange {
        table: &'static str,
        column: &'static str,
        value: i128,
    },

    #[error("dataset {0} not found")]
    DatasetNotFound(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;
