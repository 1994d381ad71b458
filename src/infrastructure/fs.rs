//! File system helpers

use std::fs;
use std::io;
use std::path::Path;

/// Deletes `path`, recursing into it if it is a directory
///
/// Returns `Ok(false)` if nothing existed at `path`. Symbolic links are
/// removed, never followed.
///
/// # Errors
///
/// Returns the I/O error that stopped the deletion.
pub fn delete_directory(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    tracing::debug!(path = %path.display(), "Deleted");
    Ok(true)
}
