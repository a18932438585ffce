//! Source discovery: walk a directory for rasters the pipeline handles.
//!
//! Produces one [`SourceEntry`] per candidate file, sorted by path so the
//! batch runs (and reports) in a deterministic order. The read-only flag
//! is captured at scan time — the batch stage uses it to restore each
//! asset's pre-processing visibility after rewriting it.
//!
//! Mip sidecars from an earlier run (`name.mip1.png` and friends) are
//! skipped; they are outputs, not sources.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions (lowercase, no dot) the pipeline can decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "tga", "bmp"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One candidate source image found under the scan root.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub path: PathBuf,
    /// Lowercased extension, no dot.
    pub extension: String,
    /// Read-only flag at scan time.
    pub readonly: bool,
}

/// Recursively collect processable images under `source`, sorted by path.
pub fn scan(source: &Path) -> Result<Vec<SourceEntry>, ScanError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(extension) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let extension = extension.to_ascii_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }
        if is_mip_sidecar(entry.path()) {
            continue;
        }
        let readonly = entry.metadata()?.permissions().readonly();
        entries.push(SourceEntry {
            path: entry.into_path(),
            extension,
            readonly,
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// `sprite.mip3.png` → true; `sprite.png`, `mipmap.png` → false.
fn is_mip_sidecar(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    match Path::new(stem).extension().and_then(|s| s.to_str()) {
        Some(inner) => inner
            .strip_prefix("mip")
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}
