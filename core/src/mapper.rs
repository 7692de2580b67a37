//! Affinity to Rust type mapping used by the generator.

use crate::Affinity;

/// Rust primitive a column is exposed as in generated code.
///
/// # Examples
///
/// ```
/// use sqlgen_core::{Affinity, RustType};
///
/// assert_eq!(RustType::for_affinity(Affinity::Integer).as_str(), "i64");
/// assert_eq!(RustType::for_affinity(Affinity::Blob).as_str(), "Vec<u8>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RustType {
    I64,
    F64,
    String,
    Bytes,
}

impl RustType {
    /// Maps an affinity to its Rust type.
    ///
    /// A new [`Affinity`] variant does not compile until it is mapped here.
    pub fn for_affinity(affinity: Affinity) -> Self {
        match affinity {
            Affinity::Integer => RustType::I64,
            Affinity::Real | Affinity::Numeric => RustType::F64,
            Affinity::Text => RustType::String,
            Affinity::Blob => RustType::Bytes,
        }
    }

    /// Type as written in Rust source.
    pub fn as_str(self) -> &'static str {
        match self {
            RustType::I64 => "i64",
            RustType::F64 => "f64",
            RustType::String => "String",
            RustType::Bytes => "Vec<u8>",
        }
    }

    /// Whether values of this type are `Copy`.
    pub fn is_copy(self) -> bool {
        matches!(self, RustType::I64 | RustType::F64)
    }

    /// Type as written in Rust source, wrapped in `Option` when `optional`.
    pub fn render(self, optional: bool) -> String {
        if optional {
            format!("Option<{}>", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_affinities_map_to_numbers() {
        assert_eq!(RustType::for_affinity(Affinity::Integer), RustType::I64);
        assert_eq!(RustType::for_affinity(Affinity::Real), RustType::F64);
        assert_eq!(RustType::for_affinity(Affinity::Numeric), RustType::F64);
    }

    #[test]
    fn test_text_and_blob_mapping() {
        assert_eq!(RustType::for_affinity(Affinity::Text), RustType::String);
        assert_eq!(RustType::for_affinity(Affinity::Blob), RustType::Bytes);
        assert!(!RustType::Bytes.is_copy());
        assert!(RustType::I64.is_copy());
    }

    #[test]
    fn test_render_optional() {
        assert_eq!(RustType::String.render(true), "Option<String>");
        assert_eq!(RustType::F64.render(false), "f64");
    }
}
