//! Table and column model extracted from a schema script.
//!
//! The types here are produced by the extraction strategies and consumed
//! by the generator. They are rebuilt from the SQL text on every run and
//! serialize with [`serde`] for the JSON schema export.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage class of a column.
///
/// Only the five keywords below are recognized; anything else declared as a
/// column type is rejected during extraction.
///
/// # Examples
///
/// ```
/// use sqlgen_core::Affinity;
///
/// assert_eq!("INTEGER".parse::<Affinity>(), Ok(Affinity::Integer));
/// assert_eq!("text".parse::<Affinity>(), Ok(Affinity::Text));
/// assert!("VARCHAR".parse::<Affinity>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Affinity {
    Integer,
    Real,
    Numeric,
    Text,
    Blob,
}

impl Affinity {
    /// Every affinity, in declaration order.
    pub const ALL: [Affinity; 5] = [
        Affinity::Integer,
        Affinity::Real,
        Affinity::Numeric,
        Affinity::Text,
        Affinity::Blob,
    ];

    /// Returns the SQL keyword for this affinity.
    pub fn keyword(self) -> &'static str {
        match self {
            Affinity::Integer => "INTEGER",
            Affinity::Real => "REAL",
            Affinity::Numeric => "NUMERIC",
            Affinity::Text => "TEXT",
            Affinity::Blob => "BLOB",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declared column type that is not one of the five affinities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAffinity(pub String);

impl fmt::Display for UnknownAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type affinity '{}'", self.0)
    }
}

impl std::error::Error for UnknownAffinity {}

impl FromStr for Affinity {
    type Err = UnknownAffinity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let declared = s.trim();
        Affinity::ALL
            .into_iter()
            .find(|affinity| affinity.keyword().eq_ignore_ascii_case(declared))
            .ok_or_else(|| UnknownAffinity(declared.to_string()))
    }
}

/// A single column definition.
///
/// Nullability is derived from the constraints rather than stored
/// independently: a column is nullable unless it is declared `NOT NULL` or
/// is part of the primary key. Use [`Column::new`] to keep that rule.
///
/// # Examples
///
/// ```
/// use sqlgen_core::{Affinity, Column};
///
/// let id = Column::new("id", Affinity::Integer, true, true, true);
/// assert!(id.is_primary_key);
/// assert!(id.is_auto_increment);
/// assert!(!id.is_nullable);
///
/// let note = Column::new("note", Affinity::Text, false, false, false);
/// assert!(note.is_nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as written in the schema.
    pub name: String,
    /// Declared storage class.
    pub affinity: Affinity,
    /// Part of the table's primary key.
    pub is_primary_key: bool,
    /// Declared `AUTOINCREMENT`.
    pub is_auto_increment: bool,
    /// Accepts NULL.
    pub is_nullable: bool,
}

impl Column {
    /// Builds a column, deriving `is_nullable` from the constraints.
    pub fn new(
        name: impl Into<String>,
        affinity: Affinity,
        not_null: bool,
        is_primary_key: bool,
        is_auto_increment: bool,
    ) -> Self {
        Self {
            name: name.into(),
            affinity,
            is_primary_key,
            is_auto_increment,
            is_nullable: !(not_null || is_primary_key),
        }
    }
}

/// A table and its columns in source order.
///
/// Column order drives the order of generated struct fields and of the
/// column lists in generated statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name as written in the schema.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Columns a caller supplies on insert (everything but autoincrement keys).
    pub fn insertable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| !column.is_auto_increment)
    }
}
