//! Schema extraction from SQL table-definition scripts.
//!
//! This crate turns a script of `CREATE TABLE IF NOT EXISTS` statements into
//! an ordered list of [`Table`]s. Index, trigger and drop statements are
//! recognized and skipped, and SQLite's internal catalog tables never reach
//! the result.
//!
//! # Main entry points
//!
//! - [`extract`]: run the chosen [`Strategy`] over a script.
//! - [`LiveExtractor`]: catalog introspection on a scratch in-memory
//!   database (preferred).
//! - [`PatternExtractor`]: static line-by-line pattern matching.
//!
//! # Example
//!
//! ```
//! use sqlgen_extract::{Strategy, extract};
//!
//! let sql = "\
//! CREATE TABLE IF NOT EXISTS periodicTask (
//!   id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
//!   name TEXT NOT NULL,
//!   intervalDay INTEGER
//! );
//! ";
//!
//! for strategy in [Strategy::Live, Strategy::Pattern] {
//!     let tables = extract(sql, strategy).unwrap();
//!     let columns = &tables[0].columns;
//!     assert_eq!(columns.len(), 3);
//!     assert!(columns[0].is_auto_increment);
//!     assert!(!columns[1].is_nullable);
//!     assert!(columns[2].is_nullable);
//! }
//! ```
//!
//! [`Table`]: sqlgen_core::Table

mod error;
pub mod strategies;

use sqlgen_core::Table;
use tracing::info;

pub use error::{ExtractError, Result};
pub use strategies::{LiveExtractor, PatternExtractor, SchemaExtractor, Strategy};

/// Extracts every table declared in `sql` using `strategy`.
///
/// # Errors
///
/// Returns [`ExtractError::SchemaParse`] for DDL the strategy cannot read,
/// [`ExtractError::UnknownTypeAffinity`] for a column type outside the five
/// affinities, and [`ExtractError::Invalid`] when the resulting model breaks
/// a structural invariant.
pub fn extract(sql: &str, strategy: Strategy) -> Result<Vec<Table>> {
    let tables = strategy.extractor().extract(sql)?;
    info!(
        ?strategy,
        tables = tables.len(),
        "extracted schema"
    );
    Ok(tables)
}
