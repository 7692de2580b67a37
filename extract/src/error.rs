//! Error types for schema extraction.

use sqlgen_core::ValidationError;
use thiserror::Error;

/// Errors that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A DDL construct the extractor does not understand.
    #[error("schema parse error: {0}")]
    SchemaParse(String),

    /// A column declared with a type outside the five affinities.
    #[error("unknown type affinity '{declared}' for column {table}.{column}")]
    UnknownTypeAffinity {
        table: String,
        column: String,
        declared: String,
    },

    /// Failure of the scratch database used for live introspection.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The extracted model violates a structural invariant.
    #[error("invalid schema: {0}")]
    Invalid(#[from] ValidationError),
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
