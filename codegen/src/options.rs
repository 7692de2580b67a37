//! Generator options.

use crate::error::{CodegenError, Result};
use crate::naming::is_identifier;

/// Derives every generated parameter struct carries.
pub const BASE_DERIVES: [&str; 4] = ["Debug", "Clone", "PartialEq", "Default"];

/// Settings that shape the generated module without changing its semantics.
///
/// # Examples
///
/// ```
/// use sqlgen_codegen::GeneratorOptions;
///
/// let options = GeneratorOptions::default()
///     .with_runtime_crate("crate::rt")
///     .with_derives(["serde::Serialize"]);
/// assert!(options.validate().is_ok());
///
/// let broken = GeneratorOptions::default().with_runtime_crate("not a path");
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Path through which generated code reaches `sqlgen-runtime`.
    pub runtime_crate: String,
    /// Extra derives for the parameter structs, after [`BASE_DERIVES`].
    ///
    /// Derives that need every field type to implement them (`Eq`, `Hash`)
    /// only compile for schemas without `REAL`/`NUMERIC` columns.
    pub derives: Vec<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            runtime_crate: "sqlgen_runtime".to_string(),
            derives: Vec::new(),
        }
    }
}

impl GeneratorOptions {
    /// Sets the runtime crate path.
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Sets the extra derives.
    pub fn with_derives<I, S>(mut self, derives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derives = derives.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that every configured path is a well-formed Rust path.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Config`] for a malformed path, or for a derive
    /// that repeats one of [`BASE_DERIVES`] or an earlier entry.
    pub fn validate(&self) -> Result<()> {
        if !is_path(&self.runtime_crate) {
            return Err(CodegenError::Config(format!(
                "runtime_crate `{}` is not a Rust path",
                self.runtime_crate
            )));
        }
        for (index, derive) in self.derives.iter().enumerate() {
            if !is_path(derive) {
                return Err(CodegenError::Config(format!(
                    "derive `{derive}` is not a Rust path"
                )));
            }
            if BASE_DERIVES.contains(&derive.as_str()) || self.derives[..index].contains(derive) {
                return Err(CodegenError::Config(format!(
                    "derive `{derive}` is listed twice"
                )));
            }
        }
        Ok(())
    }

    /// Renders the derive attribute for parameter structs.
    pub(crate) fn derive_attribute(&self) -> String {
        let derives: Vec<&str> = BASE_DERIVES
            .iter()
            .copied()
            .chain(self.derives.iter().map(String::as_str))
            .collect();
        format!("#[derive({})]", derives.join(", "))
    }
}

fn is_path(path: &str) -> bool {
    let path = path.strip_prefix("::").unwrap_or(path);
    !path.is_empty() && path.split("::").all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attribute() {
        assert_eq!(
            GeneratorOptions::default().derive_attribute(),
            "#[derive(Debug, Clone, PartialEq, Default)]"
        );
    }

    #[test]
    fn test_extra_derives_follow_base_derives() {
        let options = GeneratorOptions::default().with_derives(["serde::Serialize", "Eq"]);
        assert_eq!(
            options.derive_attribute(),
            "#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, Eq)]"
        );
    }

    #[test]
    fn test_validate_accepts_absolute_and_crate_paths() {
        for path in ["sqlgen_runtime", "::sqlgen_runtime", "crate::db::rt"] {
            let options = GeneratorOptions::default().with_runtime_crate(path);
            assert!(options.validate().is_ok(), "{path}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_paths() {
        for path in ["", "::", "a::", "a b", "a-b", "1a"] {
            let options = GeneratorOptions::default().with_runtime_crate(path);
            assert!(
                matches!(options.validate(), Err(CodegenError::Config(_))),
                "{path:?}"
            );
        }
    }

    #[test]
    fn test_validate_rejects_repeated_derives() {
        let base = GeneratorOptions::default().with_derives(["Clone"]);
        assert!(base.validate().is_err());

        let twice = GeneratorOptions::default().with_derives(["Eq", "Eq"]);
        assert!(twice.validate().is_err());
    }
}
