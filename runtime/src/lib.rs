//! Runtime support for generated SQLite data-access code.
//!
//! Generated modules call into this crate at request time to turn typed
//! parameter structs into SQL text plus named parameters, and run the
//! result through a [`Datastore`].
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - **`builder`**: fragment builders such as [`as_condition_part`],
//!   [`as_into_values`], [`batch_statement`], [`delete_statement`],
//!   [`alias`]
//! - **`datastore`**: the [`Datastore`] trait and its `rusqlite`-backed
//!   [`Db`], with a logging query hook
//! - **`error`**: [`RuntimeError`] and [`ignore_duplicate`]
//!
//! # Quick start
//!
//! ```
//! use sqlgen_runtime::{BatchVerb, Datastore, Db, Value, batch_statement};
//!
//! let db = Db::open_in_memory().unwrap();
//! db.initialize("CREATE TABLE IF NOT EXISTS point (x INTEGER NOT NULL, y INTEGER NOT NULL);")
//!     .unwrap();
//!
//! let rows = vec![
//!     vec![("x", Value::Integer(1)), ("y", Value::Integer(2))],
//!     vec![("x", Value::Integer(3)), ("y", Value::Integer(4))],
//! ];
//! let (sql, params) = batch_statement(BatchVerb::Insert, "point", &["x", "y"], &rows).unwrap();
//! db.query(&sql, &params).unwrap();
//!
//! assert_eq!(db.query("SELECT * FROM point", &[]).unwrap().len(), 2);
//! ```

mod builder;
mod datastore;
mod error;

pub use builder::{
    BatchVerb, Fields, NamedParams, alias, as_condition_part, as_into_values, batch_statement,
    delete_statement, named, uniform_columns,
};
pub use datastore::{Datastore, Db, QueryHook, Row, log_query};
pub use error::{Result, RuntimeError, ignore_duplicate};
pub use rusqlite::types::Value;
