//! Catalog introspection on a scratch SQLite database.
//!
//! The script is executed against a fresh in-memory database which is
//! dropped once the catalog has been read. SQLite does not report
//! `AUTOINCREMENT` in its column metadata, so that flag is recovered by
//! searching the table's own `CREATE` statement for the keyword after the
//! column name.

use regex::Regex;
use rusqlite::Connection;
use sqlgen_core::{Affinity, Column, Table, validate_tables};
use tracing::debug;

use super::SchemaExtractor;
use crate::error::{ExtractError, Result};

/// Extracts tables by executing the script and reading the SQLite catalog.
///
/// # Examples
///
/// ```
/// use sqlgen_extract::{LiveExtractor, SchemaExtractor};
///
/// let sql = "CREATE TABLE IF NOT EXISTS doneTask (
///   id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
///   doneAt TEXT NOT NULL
/// );";
/// let tables = LiveExtractor.extract(sql).unwrap();
/// assert_eq!(tables[0].name, "doneTask");
/// assert!(tables[0].columns[0].is_auto_increment);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveExtractor;

impl SchemaExtractor for LiveExtractor {
    fn extract(&self, sql: &str) -> Result<Vec<Table>> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(sql)
            .map_err(|e| ExtractError::SchemaParse(e.to_string()))?;

        let tables = fetch_tables(&conn)?;
        if let Some(error) = validate_tables(&tables).into_iter().next() {
            return Err(error.into());
        }
        Ok(tables)
    }
}

fn fetch_tables(conn: &Connection) -> Result<Vec<Table>> {
    let mut stmt =
        conn.prepare("SELECT name, sql FROM sqlite_schema WHERE type = 'table' ORDER BY rowid")?;
    let entries: Vec<(String, Option<String>)> = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut tables = Vec::with_capacity(entries.len());
    for (name, create_sql) in entries {
        if name.starts_with("sqlite_") {
            debug!(table = %name, "skipping internal table");
            continue;
        }
        let table = fetch_table(conn, &name, create_sql.as_deref().unwrap_or_default())?;
        debug!(table = %table.name, columns = table.columns.len(), "introspected table");
        tables.push(table);
    }
    Ok(tables)
}

struct ColumnInfo {
    name: String,
    declared_type: String,
    not_null: bool,
    primary_key: bool,
}

fn fetch_table(conn: &Connection, name: &str, create_sql: &str) -> Result<Table> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
    )?;
    let infos: Vec<ColumnInfo> = stmt
        .query_map([name], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                declared_type: row.get(1)?,
                not_null: row.get::<_, i64>(2)? != 0,
                primary_key: row.get::<_, i64>(3)? > 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let body = table_body(create_sql);
    let mut table = Table::new(name);
    for info in infos {
        let affinity: Affinity =
            info.declared_type
                .parse()
                .map_err(|_| ExtractError::UnknownTypeAffinity {
                    table: name.to_string(),
                    column: info.name.clone(),
                    declared: info.declared_type.clone(),
                })?;
        let auto_increment = info.primary_key
            && affinity == Affinity::Integer
            && declares_autoincrement(body, &info.name);
        table.columns.push(Column::new(
            info.name,
            affinity,
            info.not_null,
            info.primary_key,
            auto_increment,
        ));
    }
    Ok(table)
}

/// Returns the column-definition part of a `CREATE TABLE` statement.
fn table_body(create_sql: &str) -> &str {
    create_sql
        .find('(')
        .map_or(create_sql, |open| &create_sql[open + 1..])
}

/// Whether `AUTOINCREMENT` follows `column` within the same definition.
fn declares_autoincrement(body: &str, column: &str) -> bool {
    let pattern = format!(
        r#"(?i)(?:^|[^A-Za-z0-9_]){}["`\]]?\s[^,]*\bAUTOINCREMENT\b"#,
        regex::escape(column)
    );
    Regex::new(&pattern).is_ok_and(|re| re.is_match(body))
}
