//! Typed Rust data-access code from an extracted SQL schema.
//!
//! [`generate`] turns the tables extracted from a schema script, plus the
//! script itself, into one [`GeneratedModule`]. The module is assembled in
//! memory and written with [`GeneratedModule::write_to`] as a single atomic
//! step, so a failed run never leaves partial output behind. Output is
//! deterministic: the same input always renders byte-identical source.
//!
//! # Generated items
//!
//! - `CREATE_TABLE`, the schema script verbatim.
//! - `tables`, one name constant per table plus `tables::ALL`.
//! - `columns`, one module per table of `"table.column"` constants.
//! - `AllColumns`, a closed enum of every qualified column.
//! - Per table `T`: `InsertTParams`, `ReplaceTParams` and `DeleteTParams`
//!   structs with `insert_t`, `replace_t` and `delete_t` functions, generic
//!   over any `sqlgen_runtime::Datastore`.
//!
//! # Example
//!
//! ```
//! use sqlgen_codegen::{GeneratorOptions, generate};
//! use sqlgen_core::{Affinity, Column, Table};
//!
//! let sql = "CREATE TABLE IF NOT EXISTS doneTask (\n  doneAt TEXT NOT NULL\n);\n";
//! let tables = vec![
//!     Table::new("doneTask").with_column(Column::new("doneAt", Affinity::Text, true, false, false)),
//! ];
//!
//! let module = generate(&tables, sql, &GeneratorOptions::default()).unwrap();
//! let source = module.render();
//! assert!(source.contains("pub struct InsertDoneTaskParams {"));
//! assert!(source.contains("pub fn delete_done_task<D: rt::Datastore>("));
//! ```

mod block;
mod emit;
mod error;
mod module;
pub mod naming;
mod options;

use std::path::Path;

use sqlgen_core::{SchemaDocument, Table};
use tracing::info;

pub use error::{CodegenError, Result};
pub use module::{GeneratedModule, HEADER, Section};
pub use options::{BASE_DERIVES, GeneratorOptions};

/// Builds the generated module for `tables`, extracted from `sql`.
///
/// # Errors
///
/// Returns [`CodegenError::Config`] for invalid `options` and
/// [`CodegenError::NameCollision`] when two schema names would produce the
/// same Rust identifier.
pub fn generate(tables: &[Table], sql: &str, options: &GeneratorOptions) -> Result<GeneratedModule> {
    options.validate()?;
    naming::check_collisions(tables)?;

    let mut sections = Vec::with_capacity(tables.len() + 1);
    sections.push(Section::new(
        "schema",
        emit::global_section(tables, sql, options).render(),
    ));
    for table in tables {
        sections.push(Section::new(
            table.name.as_str(),
            emit::table_section(table, options).render(),
        ));
    }

    info!(tables = tables.len(), "generated module");
    Ok(GeneratedModule::new(sections))
}

/// Writes `tables` and `sql` as a pretty-printed [`SchemaDocument`].
///
/// # Errors
///
/// Returns [`CodegenError::Serialize`] if serialization fails and
/// [`CodegenError::OutputWrite`] if `path` cannot be written.
pub fn write_json(tables: &[Table], sql: &str, path: impl AsRef<Path>) -> Result<()> {
    let mut document = SchemaDocument::new(sql);
    document.tables = tables.to_vec();
    let mut json = document.to_json()?;
    json.push('\n');
    module::write_atomic(path.as_ref(), &json)?;
    info!(tables = document.table_count(), "wrote schema document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlgen_core::{Affinity, Column};

    use super::*;

    fn tables() -> Vec<Table> {
        vec![
            Table::new("periodicTask")
                .with_column(Column::new("id", Affinity::Integer, true, true, true))
                .with_column(Column::new("name", Affinity::Text, true, false, false)),
            Table::new("doneTask")
                .with_column(Column::new("id", Affinity::Integer, true, true, true))
                .with_column(Column::new("doneAt", Affinity::Text, true, false, false)),
        ]
    }

    #[test]
    fn test_sections_follow_table_order() {
        let module = generate(&tables(), "", &GeneratorOptions::default()).unwrap();
        let titles: Vec<&str> = module.sections().iter().map(Section::title).collect();
        assert_eq!(titles, ["schema", "periodicTask", "doneTask"]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let sql = "CREATE TABLE IF NOT EXISTS x (a TEXT);";
        let first = generate(&tables(), sql, &GeneratorOptions::default()).unwrap();
        let second = generate(&tables(), sql, &GeneratorOptions::default()).unwrap();
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = GeneratorOptions::default().with_runtime_crate("no way");
        assert!(matches!(
            generate(&tables(), "", &options),
            Err(CodegenError::Config(_))
        ));
    }

    #[test]
    fn test_write_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        write_json(&tables(), "CREATE TABLE", &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let document: SchemaDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(document.create_table, "CREATE TABLE");
        assert_eq!(document.tables, tables());
    }
}
