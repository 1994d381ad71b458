use super::filter::IncludeFilter;
use super::traits::NodeChannel;
use crate::errors::NodeError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Channel onto the local file system
///
/// Used for builds that run on the controller, and as the transport for
/// agents whose workspaces are mounted locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalChannel;

impl LocalChannel {
    /// Creates a new local channel
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Walks `root` and returns the paths of all regular files relative to it,
/// sorted so listings are deterministic
fn relative_files(root: &Path) -> Result<Vec<PathBuf>, NodeError> {
    let mut files = Vec::new();
    let mut stack = vec![PathBuf::new()];

    while let Some(rel) = stack.pop() {
        let dir = root.join(&rel);
        let entries = fs::read_dir(&dir).map_err(|e| NodeError::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| NodeError::io(&dir, e))?;
            let file_type = entry.file_type().map_err(|e| NodeError::io(entry.path(), e))?;
            let entry_rel = rel.join(entry.file_name());
            if file_type.is_dir() {
                stack.push(entry_rel);
            } else if file_type.is_file() || entry.path().is_file() {
                files.push(entry_rel);
            }
        }
    }

    files.sort();
    Ok(files)
}

impl NodeChannel for LocalChannel {
    fn copy_tree(
        &self,
        source: &Path,
        dest: &Path,
        filter: &IncludeFilter,
    ) -> Result<usize, NodeError> {
        let mut copied = 0;
        for rel in relative_files(source)? {
            if !filter.matches(&rel) {
                continue;
            }
            let target = dest.join(&rel);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| NodeError::io(parent, e))?;
            }
            fs::copy(source.join(&rel), &target).map_err(|e| NodeError::io(&target, e))?;
            tracing::debug!(file = %rel.display(), dest = %dest.display(), "Copied file");
            copied += 1;
        }
        Ok(copied)
    }

    fn list_matching(
        &self,
        dir: &Path,
        filter: &IncludeFilter,
    ) -> Result<Vec<PathBuf>, NodeError> {
        Ok(relative_files(dir)?
            .into_iter()
            .filter(|rel| filter.matches(rel))
            .map(|rel| dir.join(rel))
            .collect())
    }

    fn copy_with_permissions(&self, from: &Path, to: &Path) -> Result<(), NodeError> {
        let metadata = fs::metadata(from).map_err(|e| NodeError::io(from, e))?;

        // An earlier copy may be read-only; unlinking only needs the directory.
        match fs::remove_file(to) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(NodeError::io(to, e)),
            _ => {}
        }

        let mut source = File::open(from).map_err(|e| NodeError::io(from, e))?;
        let mut target = File::create(to).map_err(|e| NodeError::io(to, e))?;
        io::copy(&mut source, &mut target).map_err(|e| NodeError::io(to, e))?;
        if let Ok(modified) = metadata.modified() {
            target
                .set_modified(modified)
                .map_err(|e| NodeError::io(to, e))?;
        }
        drop(target);

        fs::set_permissions(to, metadata.permissions()).map_err(|e| NodeError::io(to, e))
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, NodeError> {
        fs::canonicalize(path).map_err(|source| NodeError::Unresolvable {
            path: path.to_path_buf(),
            source,
        })
    }
}
