//! Writer. Serializes the grouped docs and replaces the artifact atomically.

use crate::error::{DocsError, Result};
use crate::model::GroupedDocs;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `docs` as JSON to `path`.
///
/// The JSON goes to a temporary file next to `path` first and is renamed into
/// place once complete, so a failed run never leaves a truncated artifact.
pub fn write_docs(docs: &GroupedDocs, path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(docs)?
    } else {
        serde_json::to_string(docs)?
    };

    let write_error = |source: std::io::Error| DocsError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_error)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(json.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    tracing::info!(path = %path.display(), bytes = json.len(), "wrote documentation");
    Ok(())
}
