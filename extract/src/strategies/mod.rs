//! Extraction strategies.
//!
//! - [`live`]: executes the script against a scratch in-memory SQLite
//!   database and reads the catalog back. Authoritative for types and
//!   nullability, and copes with multi-line constraint syntax.
//! - [`pattern`]: line-oriented regex scan folded over the script. Needs no
//!   database but only understands one column definition per line.

pub mod live;
pub mod pattern;

use serde::{Deserialize, Serialize};
use sqlgen_core::Table;

use crate::error::Result;

pub use live::LiveExtractor;
pub use pattern::PatternExtractor;

/// Turns a schema script into an ordered table list.
pub trait SchemaExtractor {
    /// Extracts every table declared in `sql`, in source order.
    fn extract(&self, sql: &str) -> Result<Vec<Table>>;
}

/// Selects an extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Catalog introspection on a scratch database (the default).
    #[default]
    Live,
    /// Static line-by-line pattern matching.
    Pattern,
}

impl Strategy {
    /// Returns the extractor implementing this strategy.
    pub fn extractor(self) -> Box<dyn SchemaExtractor> {
        match self {
            Strategy::Live => Box::new(LiveExtractor),
            Strategy::Pattern => Box::new(PatternExtractor),
        }
    }
}
