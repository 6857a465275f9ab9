//! Source lister. Resolves configured patterns into an ordered file list.

use crate::error::{DocsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions picked up when a pattern names a directory.
const SUPPORTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "tsx"];

/// Expand patterns (relative to `root`) into a sorted, deduplicated file list.
///
/// A pattern may be a file, a directory (scanned non-recursively for
/// supported extensions), or a glob.
pub fn list_sources(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = root.join(pattern);
        if path.is_file() {
            files.push(path);
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(&path).map_err(|source| DocsError::ReadDir {
                path: path.clone(),
                source,
            })?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        // Only the pattern is glob syntax; the root is matched literally.
        let full = Path::new(&glob::Pattern::escape(&root.to_string_lossy())).join(pattern);
        let matches: Vec<_> = glob::glob(&full.to_string_lossy())
            .map_err(|e| DocsError::Glob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), "listed source files");
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
