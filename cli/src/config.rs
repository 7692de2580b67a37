//! Optional YAML configuration file.
//!
//! # Example YAML
//!
//! ```yaml
//! strategy: pattern
//! runtime_crate: crate::db::rt
//! derives:
//!   - serde::Serialize
//! ```
//!
//! Every key is optional. Flags given on the command line win over the file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use sqlgen_codegen::GeneratorOptions;
use sqlgen_extract::Strategy;

/// Settings read from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Extraction strategy used when `--strategy` is not given.
    pub strategy: Option<Strategy>,
    /// Path generated code uses to reach the runtime crate.
    pub runtime_crate: Option<String>,
    /// Extra derives for generated parameter structs.
    pub derives: Option<Vec<String>>,
}

impl FileConfig {
    /// Loads and parses a configuration file. An empty file is all defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("cannot read config {}: {err}", path.display()))?;
        Self::parse(&text).map_err(|err| format!("invalid config {}: {err}", path.display()))
    }

    fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Generator options with the file's overrides applied.
    pub fn generator_options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::default();
        if let Some(runtime_crate) = &self.runtime_crate {
            options.runtime_crate = runtime_crate.clone();
        }
        if let Some(derives) = &self.derives {
            options.derives = derives.clone();
        }
        options
    }
}
