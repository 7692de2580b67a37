//! SQL fragment builders called by generated code.
//!
//! Every function here is pure: it allocates only local data and takes no
//! locks, so calls are safe from any number of threads. Table and column
//! names passed in come from generated code, never from end users; values
//! are always bound as named parameters.

use rusqlite::types::Value;
use tracing::warn;

use crate::error::{Result, RuntimeError};

/// Ordered column-name/value pairs for one row or one filter set.
pub type Fields = Vec<(&'static str, Value)>;

/// Ordered parameter-name/value pairs, names without the leading `:`.
pub type NamedParams = Vec<(String, Value)>;

/// Statement verb of a batched write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchVerb {
    Insert,
    Replace,
}

impl BatchVerb {
    /// SQL keyword for this verb.
    pub fn keyword(self) -> &'static str {
        match self {
            BatchVerb::Insert => "INSERT",
            BatchVerb::Replace => "REPLACE",
        }
    }
}

/// Builds a conjunctive equality condition over `fields`.
///
/// Each name `k` becomes `k = :k`, joined with ` AND ` in the order given.
/// An empty slice yields an empty string.
///
/// # Examples
///
/// ```
/// use sqlgen_runtime::{Value, as_condition_part};
///
/// assert_eq!(as_condition_part(&[]), "");
/// assert_eq!(
///     as_condition_part(&[("a", Value::Integer(1)), ("b", Value::Integer(2))]),
///     "a = :a AND b = :b"
/// );
/// ```
pub fn as_condition_part(fields: &[(&str, Value)]) -> String {
    fields
        .iter()
        .map(|(name, _)| format!("{name} = :{name}"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Builds the tuple list of a batched `VALUES` clause.
///
/// Row `i` binds each of its keys `k` as parameter `{i}_k`, so parameter
/// names never collide across rows. A row's tuple lists the columns of
/// `all_columns` that the row supplies, in `all_columns` order.
///
/// The enclosing statement names its columns once, so the result is only
/// meaningful when every row supplies the same columns. Generated code goes
/// through [`batch_statement`], which checks that first.
///
/// # Examples
///
/// ```
/// use sqlgen_runtime::{Value, as_into_values};
///
/// let rows = vec![
///     vec![("x", Value::Integer(1)), ("y", Value::Integer(2))],
///     vec![("x", Value::Integer(3))],
/// ];
/// let (values, params) = as_into_values(&rows, &["x", "y"]);
/// assert_eq!(values, "(:0_x, :0_y), (:1_x)");
/// assert_eq!(params.len(), 3);
/// ```
pub fn as_into_values(rows: &[Fields], all_columns: &[&str]) -> (String, NamedParams) {
    let mut params = NamedParams::new();
    let mut tuples = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        for (name, value) in row {
            params.push((format!("{index}_{name}"), value.clone()));
        }
        let placeholders: Vec<String> = all_columns
            .iter()
            .filter(|column| row.iter().any(|(name, _)| name == *column))
            .map(|column| format!(":{index}_{column}"))
            .collect();
        tuples.push(format!("({})", placeholders.join(", ")));
    }

    (tuples.join(", "), params)
}

/// Returns the columns every row of a batch supplies, in `all_columns` order.
///
/// # Errors
///
/// Returns [`RuntimeError::MismatchedColumns`] naming the first row whose
/// column subset differs from row 0.
pub fn uniform_columns<'c>(
    table: &str,
    rows: &[Fields],
    all_columns: &[&'c str],
) -> Result<Vec<&'c str>> {
    let supplied = |row: &Fields| -> Vec<&'c str> {
        all_columns
            .iter()
            .copied()
            .filter(|column| row.iter().any(|(name, _)| name == column))
            .collect()
    };

    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let expected = supplied(first);
    for (index, row) in rows.iter().enumerate().skip(1) {
        let found = supplied(row);
        if found != expected {
            return Err(RuntimeError::MismatchedColumns {
                table: table.to_string(),
                row: index,
                expected: expected.join(", "),
                found: found.join(", "),
            });
        }
    }
    Ok(expected)
}

/// Builds a single batched `INSERT`/`REPLACE` statement for `rows`.
///
/// Rows are written in the order given, in one round trip. Rows that supply
/// no column at all are written as `(rowid) VALUES (NULL), ...`, so SQLite
/// assigns each row id and every other column takes its default.
///
/// # Errors
///
/// Returns [`RuntimeError::EmptyBatch`] when `rows` is empty and
/// [`RuntimeError::MismatchedColumns`] when rows supply different columns.
///
/// # Examples
///
/// ```
/// use sqlgen_runtime::{BatchVerb, Value, batch_statement};
///
/// let rows = vec![
///     vec![("name", Value::from("a".to_string()))],
///     vec![("name", Value::from("b".to_string()))],
/// ];
/// let (sql, params) = batch_statement(BatchVerb::Insert, "task", &["id", "name"], &rows).unwrap();
/// assert_eq!(sql, "INSERT INTO task (name) VALUES (:0_name), (:1_name)");
/// assert_eq!(params[1].0, "1_name");
/// ```
pub fn batch_statement(
    verb: BatchVerb,
    table: &str,
    all_columns: &[&str],
    rows: &[Fields],
) -> Result<(String, NamedParams)> {
    if rows.is_empty() {
        return Err(RuntimeError::EmptyBatch(table.to_string()));
    }
    let columns = uniform_columns(table, rows, all_columns)?;
    if columns.is_empty() {
        let values = vec!["(NULL)"; rows.len()].join(", ");
        let sql = format!("{} INTO {table} (rowid) VALUES {values}", verb.keyword());
        return Ok((sql, Vec::new()));
    }
    let (values, params) = as_into_values(rows, all_columns);
    let sql = format!(
        "{} INTO {table} ({}) VALUES {values}",
        verb.keyword(),
        columns.join(", ")
    );
    Ok((sql, params))
}

/// Builds a `DELETE` statement filtered by equality on every field.
///
/// An empty filter produces `DELETE FROM {table} WHERE ` with no condition,
/// which SQLite rejects as a syntax error, so an unfiltered delete can never
/// empty a table by accident.
///
/// # Examples
///
/// ```
/// use sqlgen_runtime::{Value, delete_statement};
///
/// assert_eq!(
///     delete_statement("doneTask", &[("id", Value::Integer(3))]),
///     "DELETE FROM doneTask WHERE id = :id"
/// );
/// ```
pub fn delete_statement(table: &str, filters: &[(&str, Value)]) -> String {
    if filters.is_empty() {
        warn!(table, "delete called without any filter");
    }
    format!("DELETE FROM {table} WHERE {}", as_condition_part(filters))
}

/// Converts filter fields into named parameters.
pub fn named(fields: Fields) -> NamedParams {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Rewrites a qualified `table.column` name onto a table alias.
///
/// # Examples
///
/// ```
/// use sqlgen_runtime::alias;
///
/// assert_eq!(alias("done", "doneTask.doneAt"), "done.doneAt");
/// assert_eq!(alias("done", "doneAt"), "done.doneAt");
/// ```
pub fn alias(table_alias: &str, qualified: &str) -> String {
    let column = qualified
        .split_once('.')
        .map_or(qualified, |(_, column)| column);
    format!("{table_alias}.{column}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Integer(n)
    }

    #[test]
    fn test_condition_part_empty() {
        assert_eq!(as_condition_part(&[]), "");
    }

    #[test]
    fn test_condition_part_single() {
        assert_eq!(as_condition_part(&[("a", int(1))]), "a = :a");
    }

    #[test]
    fn test_condition_part_keeps_insertion_order() {
        assert_eq!(
            as_condition_part(&[("b", int(2)), ("a", int(1))]),
            "b = :b AND a = :a"
        );
    }

    #[test]
    fn test_into_values_full_rows() {
        let rows = vec![
            vec![("x", int(1)), ("y", int(2))],
            vec![("x", int(3)), ("y", int(4))],
        ];
        let (values, params) = as_into_values(&rows, &["x", "y"]);
        assert_eq!(values, "(:0_x, :0_y), (:1_x, :1_y)");
        assert_eq!(
            params,
            vec![
                ("0_x".to_string(), int(1)),
                ("0_y".to_string(), int(2)),
                ("1_x".to_string(), int(3)),
                ("1_y".to_string(), int(4)),
            ]
        );
    }

    #[test]
    fn test_into_values_row_with_omitted_column() {
        let rows = vec![vec![("x", int(1)), ("y", int(2))], vec![("x", int(3))]];
        let (values, params) = as_into_values(&rows, &["x", "y"]);
        assert_eq!(values, "(:0_x, :0_y), (:1_x)");
        assert_eq!(
            params,
            vec![
                ("0_x".to_string(), int(1)),
                ("0_y".to_string(), int(2)),
                ("1_x".to_string(), int(3)),
            ]
        );
    }

    #[test]
    fn test_into_values_tuple_follows_column_order() {
        let rows = vec![vec![("y", int(2)), ("x", int(1))]];
        let (values, _) = as_into_values(&rows, &["x", "y"]);
        assert_eq!(values, "(:0_x, :0_y)");
    }

    #[test]
    fn test_uniform_columns_rejects_mixed_rows() {
        let rows = vec![vec![("x", int(1)), ("y", int(2))], vec![("x", int(3))]];
        let err = uniform_columns("t", &rows, &["x", "y"]).unwrap_err();
        match err {
            RuntimeError::MismatchedColumns {
                row,
                expected,
                found,
                ..
            } => {
                assert_eq!(row, 1);
                assert_eq!(expected, "x, y");
                assert_eq!(found, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_batch_statement_replace() {
        let rows = vec![
            vec![("id", int(1)), ("name", Value::Text("a".into()))],
            vec![("id", int(2)), ("name", Value::Text("b".into()))],
        ];
        let (sql, params) =
            batch_statement(BatchVerb::Replace, "task", &["id", "name"], &rows).unwrap();
        assert_eq!(
            sql,
            "REPLACE INTO task (id, name) VALUES (:0_id, :0_name), (:1_id, :1_name)"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_batch_statement_rejects_empty_batch() {
        assert!(matches!(
            batch_statement(BatchVerb::Insert, "task", &["id"], &[]),
            Err(RuntimeError::EmptyBatch(_))
        ));
    }

    #[test]
    fn test_batch_statement_without_columns_binds_rowid() {
        let (sql, params) =
            batch_statement(BatchVerb::Insert, "counter", &[], &[Vec::new(), Vec::new()]).unwrap();
        assert_eq!(sql, "INSERT INTO counter (rowid) VALUES (NULL), (NULL)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_batch_statement_without_columns_inserts_default_rows() {
        use crate::{Datastore, Db};

        let db = Db::open_in_memory().unwrap();
        db.execute("CREATE TABLE counter (id INTEGER PRIMARY KEY AUTOINCREMENT);")
            .unwrap();
        let (sql, params) =
            batch_statement(BatchVerb::Insert, "counter", &[], &[Vec::new(), Vec::new()]).unwrap();
        db.query(&sql, &params).unwrap();

        let rows = db.query("SELECT id FROM counter ORDER BY id", &[]).unwrap();
        assert_eq!(rows, vec![vec![int(1)], vec![int(2)]]);
    }

    #[test]
    fn test_delete_statement_joins_filters() {
        assert_eq!(
            delete_statement("t", &[("a", int(1)), ("b", int(2))]),
            "DELETE FROM t WHERE a = :a AND b = :b"
        );
    }

    #[test]
    fn test_delete_statement_without_filter_has_empty_condition() {
        assert_eq!(delete_statement("t", &[]), "DELETE FROM t WHERE ");
    }

    #[test]
    fn test_named_keeps_order() {
        let params = named(vec![("b", int(2)), ("a", int(1))]);
        assert_eq!(params[0].0, "b");
        assert_eq!(params[1].0, "a");
    }
}
