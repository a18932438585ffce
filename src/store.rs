//! Filesystem access trait for the batch stage.
//!
//! [`AssetStore`] is the seam between batch orchestration and the real
//! filesystem, so tests can inject failures (a write that refuses) and
//! inspect ordering (the legacy original removed only after its
//! replacement is confirmed). The production implementation is
//! [`FsStore`]; the mock lives in this module's test section.
//!
//! The read-only flag stands in for the source asset's "readable"
//! capability: the batch widens it for the duration of one item and
//! settles it back on every exit path.

use std::fs;
use std::io;
use std::path::Path;

/// Byte-level asset access used by the batch processor.
///
/// `Sync` so a single store can serve all rayon workers at once.
pub trait AssetStore: Sync {
    /// Read the full contents of a source file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes to `path`, replacing any existing file.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Remove a file. Only ever called after a confirmed write elsewhere.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Whether the file currently carries the read-only flag.
    fn is_readonly(&self, path: &Path) -> io::Result<bool>;

    /// Set or clear the read-only flag.
    fn set_readonly(&self, path: &Path, readonly: bool) -> io::Result<()>;
}

/// Production store backed by `std::fs`.
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore for FsStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn is_readonly(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.permissions().readonly())
    }

    #[allow(clippy::permissions_set_readonly_false)]
    fn set_readonly(&self, path: &Path, readonly: bool) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(readonly);
        fs::set_permissions(path, permissions)
    }
}
