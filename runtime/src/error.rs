//! Error types for generated data-access calls.

use std::os::raw::c_int;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors raised while building or running a generated statement.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// SQLite operation failure, passed through unchanged.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// File I/O failure while preparing the database location.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A batched insert/replace was called without rows.
    #[error("empty batch for table {0}")]
    EmptyBatch(String),

    /// Rows of one batch bind different column subsets.
    #[error(
        "row {row} of batch for table {table} binds columns [{found}] but row 0 binds [{expected}]"
    )]
    MismatchedColumns {
        table: String,
        row: usize,
        expected: String,
        found: String,
    },
}

/// Convenience alias for results with [`RuntimeError`].
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Swallows the constraint failure raised by a duplicate insert.
///
/// A repeated status transition is rejected by the database with a UNIQUE,
/// PRIMARY KEY or trigger (`RAISE`) constraint error; callers that treat the
/// transition as idempotent pass the insert result through here. Every other
/// error is returned unchanged.
///
/// # Examples
///
/// ```
/// use sqlgen_runtime::{Datastore, Db, ignore_duplicate};
///
/// let db = Db::open_in_memory().unwrap();
/// db.execute("CREATE TABLE t (k TEXT PRIMARY KEY);").unwrap();
/// let insert = || db.query("INSERT INTO t (k) VALUES ('a')", &[]).map(|_| ());
///
/// insert().unwrap();
/// assert!(insert().is_err());
/// assert!(ignore_duplicate(insert()).is_ok());
/// ```
pub fn ignore_duplicate(result: Result<()>) -> Result<()> {
    match result {
        Err(RuntimeError::DatabaseError(ref error)) if is_duplicate(error) => Ok(()),
        other => other,
    }
}

// SQLite extended result codes (SQLITE_CONSTRAINT | n << 8).
const CONSTRAINT_PRIMARYKEY: c_int = 1555;
const CONSTRAINT_TRIGGER: c_int = 1811;
const CONSTRAINT_UNIQUE: c_int = 2067;

fn is_duplicate(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    CONSTRAINT_PRIMARYKEY | CONSTRAINT_TRIGGER | CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_error(extended_code: c_int) -> RuntimeError {
        RuntimeError::DatabaseError(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(extended_code),
            None,
        ))
    }

    #[test]
    fn test_ignore_duplicate_swallows_constraint_codes() {
        assert!(ignore_duplicate(Err(constraint_error(CONSTRAINT_UNIQUE))).is_ok());
        assert!(ignore_duplicate(Err(constraint_error(CONSTRAINT_TRIGGER))).is_ok());
    }

    #[test]
    fn test_ignore_duplicate_propagates_other_errors() {
        // SQLITE_CONSTRAINT_NOTNULL
        let not_null = constraint_error(1299);
        assert!(ignore_duplicate(Err(not_null)).is_err());
        assert!(ignore_duplicate(Err(RuntimeError::EmptyBatch("t".to_string()))).is_err());
    }
}
