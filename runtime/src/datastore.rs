//! Datastore surface the generated functions are written against.
//!
//! Generated code only needs [`Datastore`]; [`Db`] implements it on a
//! `rusqlite` connection and routes every statement through a query hook
//! (by default [`log_query`]) before running it.
//!
//! # Example
//!
//! ```
//! use sqlgen_runtime::{Datastore, Db, Value};
//!
//! let db = Db::open_in_memory().unwrap();
//! db.initialize("CREATE TABLE IF NOT EXISTS doneTask (id INTEGER PRIMARY KEY, doneAt TEXT);")
//!     .unwrap();
//!
//! db.query(
//!     "INSERT INTO doneTask (doneAt) VALUES (:doneAt)",
//!     &[("doneAt".to_string(), Value::from("2024-01-01".to_string()))],
//! )
//! .unwrap();
//! assert_eq!(db.last_insert_id(), 1);
//!
//! let rows = db.query("SELECT doneAt FROM doneTask", &[]).unwrap();
//! assert_eq!(rows, vec![vec![Value::Text("2024-01-01".to_string())]]);
//! ```

use std::fs;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};
use tracing::debug;

use crate::error::Result;

/// One result row, values in select-list order.
pub type Row = Vec<Value>;

/// Hook called with every statement (and its parameters) before it runs.
pub type QueryHook = Box<dyn Fn(&str, Option<&[(String, Value)]>) + Send + Sync>;

/// Minimal connection interface consumed by generated code.
pub trait Datastore {
    /// Runs a script of one or more statements without parameters.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Runs one statement with named parameters and returns its rows.
    ///
    /// Parameter names are given without the leading `:`.
    fn query(&self, sql: &str, params: &[(String, Value)]) -> Result<Vec<Row>>;

    /// Runs `f` inside a transaction, committing only if it succeeds.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
        Self: Sized;

    /// Row id of the most recent successful insert.
    fn last_insert_id(&self) -> i64;
}

/// Logs a statement at debug level, skipping schema scripts.
pub fn log_query(sql: &str, params: Option<&[(String, Value)]>) {
    if sql.contains("CREATE TABLE") {
        return;
    }
    match params {
        Some(params) if !params.is_empty() => debug!(sql, ?params, "query"),
        _ => debug!(sql, "query"),
    }
}

/// SQLite-backed [`Datastore`].
pub struct Db {
    conn: Connection,
    hook: QueryHook,
}

impl Db {
    /// Wraps an open connection, logging statements with [`log_query`].
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            hook: Box::new(log_query),
        }
    }

    /// Opens (or creates) a database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self::new(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self::new(conn))
    }

    /// Replaces the query hook.
    pub fn with_hook(
        mut self,
        hook: impl Fn(&str, Option<&[(String, Value)]>) + Send + Sync + 'static,
    ) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Creates the schema by running its script.
    pub fn initialize(&self, schema: &str) -> Result<()> {
        self.execute(schema)
    }
}

impl Datastore for Db {
    fn execute(&self, sql: &str) -> Result<()> {
        (self.hook)(sql, None);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&self, sql: &str, params: &[(String, Value)]) -> Result<Vec<Row>> {
        (self.hook)(sql, Some(params));

        let names: Vec<String> = params.iter().map(|(name, _)| format!(":{name}")).collect();
        let bound: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(params)
            .map(|(name, (_, value))| (name.as_str(), value as &dyn ToSql))
            .collect();

        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query(bound.as_slice())?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                values.push(row.get::<_, Value>(index)?);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}
