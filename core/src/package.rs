use serde::{Deserialize, Serialize};

use crate::Table;

/// Serializable bundle of a schema script and the tables extracted from it.
///
/// Written by the JSON export so that tooling outside Rust can consume the
/// same model the generator works from.
///
/// # Examples
///
/// ```
/// use sqlgen_core::*;
///
/// let sql = "CREATE TABLE IF NOT EXISTS doneTask (\n  doneAt TEXT NOT NULL\n);\n";
/// let mut document = SchemaDocument::new(sql);
/// document.tables.push(
///     Table::new("doneTask").with_column(Column::new("doneAt", Affinity::Text, true, false, false)),
/// );
///
/// assert_eq!(document.table_count(), 1);
/// assert!(document.to_json().unwrap().contains("\"create_table\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Schema script, verbatim.
    pub create_table: String,
    /// Tables in source order.
    pub tables: Vec<Table>,
}

impl SchemaDocument {
    /// Creates a document for the given script with no tables yet.
    pub fn new(create_table: impl Into<String>) -> Self {
        Self {
            create_table: create_table.into(),
            tables: Vec::new(),
        }
    }

    /// Returns the number of tables in this document.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
