//! The assembled output module and its single atomic write.

use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{CodegenError, Result};

/// First line of every generated module.
pub const HEADER: &str = "// @generated by sqlgen from a SQL schema script. Do not edit.\n";

/// One titled part of a generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    title: String,
    code: String,
}

impl Section {
    pub(crate) fn new(title: impl Into<String>, code: String) -> Self {
        Self {
            title: title.into(),
            code,
        }
    }

    /// `"schema"` for the global section, otherwise the table name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rendered Rust source of this section.
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Complete generator output: the global section, then one section per
/// table in source order.
///
/// Assembled in memory and never changed afterwards; [`write_to`] is the
/// only I/O.
///
/// [`write_to`]: GeneratedModule::write_to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    sections: Vec<Section>,
}

impl GeneratedModule {
    pub(crate) fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Full module source.
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        for section in &self.sections {
            out.push('\n');
            out.push_str(section.code());
        }
        out
    }

    /// Writes the module to `path` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::OutputWrite`] if the destination cannot be
    /// written; any previous file at `path` is then left as it was.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_atomic(path.as_ref(), &self.render())
    }
}

/// Writes `contents` to a temporary file beside `path`, then renames it over
/// `path`. Readers see either the old file or the complete new one.
///
/// The result keeps the mode of the file it replaces; a new file is `0644`
/// on Unix rather than the owner-only mode of the temporary file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let output_error = |source| CodegenError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(output_error)?;
    file.write_all(contents.as_bytes()).map_err(output_error)?;
    if let Some(permissions) = output_permissions(path) {
        file.as_file()
            .set_permissions(permissions)
            .map_err(output_error)?;
    }
    file.as_file().sync_all().map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

fn output_permissions(path: &Path) -> Option<Permissions> {
    if let Ok(metadata) = fs::metadata(path) {
        return Some(metadata.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> GeneratedModule {
        GeneratedModule::new(vec![
            Section::new("schema", "pub const A: i32 = 1;\n".to_string()),
            Section::new("t", "pub const B: i32 = 2;\n".to_string()),
        ])
    }

    #[test]
    fn test_render_joins_sections_after_header() {
        assert_eq!(
            module().render(),
            format!("{HEADER}\npub const A: i32 = 1;\n\npub const B: i32 = 2;\n")
        );
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sql.rs");
        fs::write(&path, "old").unwrap();

        module().write_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), module().render());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sql.rs");

        module().write_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sql.rs");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        module().write_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_write_into_missing_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sql.rs");

        let err = module().write_to(&path).unwrap_err();

        assert!(matches!(err, CodegenError::OutputWrite { .. }));
        assert!(!path.exists());
    }
}
