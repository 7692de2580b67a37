//! Error types for code generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating or writing a module.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The destination could not be written. Nothing was persisted.
    #[error("cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization of the schema document failed.
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Generator options are unusable.
    #[error("invalid generator options: {0}")]
    Config(String),

    /// Two schema names map onto the same generated identifier.
    #[error("`{first}` and `{second}` both generate the identifier `{identifier}`")]
    NameCollision {
        identifier: String,
        first: String,
        second: String,
    },
}

/// Convenience alias for results with [`CodegenError`].
pub type Result<T> = std::result::Result<T, CodegenError>;
