//! Structural validation of an extracted table list.
//!
//! Catches models the generator cannot turn into sound code: duplicate
//! table or column names, tables without columns, and `AUTOINCREMENT` on
//! anything other than an `INTEGER` primary key.
//!
//! # Examples
//!
//! ```
//! use sqlgen_core::*;
//!
//! let tables = vec![
//!     Table::new("doneTask")
//!         .with_column(Column::new("id", Affinity::Integer, true, true, true)),
//! ];
//! assert!(validate_tables(&tables).is_empty());
//!
//! // Invalid: autoincrement on a TEXT column
//! let bad = vec![
//!     Table::new("doneTask")
//!         .with_column(Column::new("id", Affinity::Text, true, true, true)),
//! ];
//! assert!(!validate_tables(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Affinity, Table};

/// Model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two tables share a name.
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    /// Two columns of the same table share a name.
    #[error("duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },
    /// A table has no columns.
    #[error("table {0} has no columns")]
    EmptyTable(String),
    /// `AUTOINCREMENT` on a column that is not an `INTEGER` primary key.
    #[error("column {table}.{column} is AUTOINCREMENT but not an INTEGER PRIMARY KEY")]
    InvalidAutoIncrement { table: String, column: String },
}

/// Validates a list of tables, stopping at the first problem.
pub fn validate_tables(tables: &[Table]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_tables: HashSet<&str> = HashSet::new();

    for table in tables {
        if !seen_tables.insert(table.name.as_str()) {
            errors.push(ValidationError::DuplicateTable(table.name.clone()));
            return errors;
        }
        errors.extend(validate_table(table));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_table(table: &Table) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if table.columns.is_empty() {
        errors.push(ValidationError::EmptyTable(table.name.clone()));
        return errors;
    }

    let mut seen = HashSet::new();
    for column in &table.columns {
        if !seen.insert(column.name.as_str()) {
            errors.push(ValidationError::DuplicateColumn {
                table: table.name.clone(),
                column: column.name.clone(),
            });
            return errors;
        }
        if column.is_auto_increment
            && !(column.is_primary_key && column.affinity == Affinity::Integer)
        {
            errors.push(ValidationError::InvalidAutoIncrement {
                table: table.name.clone(),
                column: column.name.clone(),
            });
            return errors;
        }
    }

    errors
}
