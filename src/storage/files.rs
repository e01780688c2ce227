//! Carrier file reads and atomic output writes.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read a whole input file into memory.
///
/// Any failure is reported as [`Error::Read`] so callers see it as bad input
/// rather than a generic I/O error.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "read input");
    Ok(data)
}

/// Write data to `path` so that readers see either the old file or the
/// complete new one.
///
/// The data goes to a temporary file in the destination directory, is synced
/// to disk, then renamed over `path`. On failure the temporary file is
/// removed and `path` is left untouched.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `data` - Complete file contents
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let write_err = |reason: String| Error::Write {
        path: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    file.write_all(data).map_err(|e| write_err(e.to_string()))?;
    file.as_file()
        .sync_all()
        .map_err(|e| write_err(e.to_string()))?;
    file.persist(path).map_err(|e| write_err(e.error.to_string()))?;

    debug!(path = %path.display(), bytes = data.len(), "wrote output");
    Ok(())
}
