//! Core model for the SQL data-access generator.
//!
//! This crate defines the types shared by extraction and generation:
//!
//! - [`Table`] / [`Column`]: the schema model, in source order.
//! - [`Affinity`]: the five recognized column storage classes.
//! - [`RustType`]: the static affinity to Rust type mapping.
//! - [`SchemaDocument`]: a serializable bundle of the script and its tables.
//!
//! Validation ([`validate_tables`]) catches duplicate names, empty tables and
//! misplaced `AUTOINCREMENT` before code is generated.
//!
//! # Example
//!
//! ```
//! use sqlgen_core::*;
//!
//! let table = Table::new("periodicTask")
//!     .with_column(Column::new("id", Affinity::Integer, true, true, true))
//!     .with_column(Column::new("name", Affinity::Text, true, false, false))
//!     .with_column(Column::new("intervalDay", Affinity::Integer, false, false, false));
//!
//! assert_eq!(table.insertable_columns().count(), 2);
//! assert!(table.columns[2].is_nullable);
//! assert_eq!(RustType::for_affinity(Affinity::Text).as_str(), "String");
//! assert!(validate_tables(&[table]).is_empty());
//! ```

mod mapper;
mod package;
mod types;
mod validate;

pub use mapper::RustType;
pub use package::SchemaDocument;
pub use types::*;
pub use validate::{ValidationError, validate_tables};
