//! Node channel traits
//!
//! This module defines the file operations a build node must provide.

use super::filter::IncludeFilter;
use super::local::LocalChannel;
use crate::errors::NodeError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File operations performed on a node, possibly across a remoting channel
///
/// Paths passed as destinations and listing roots are interpreted on the
/// node; the `source` of [`NodeChannel::copy_tree`] lives on the controller.
pub trait NodeChannel: Send + Sync + fmt::Debug {
    /// Copies every file under `source` whose relative path matches `filter`
    /// into `dest`, preserving the directory structure
    ///
    /// Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError`] if a directory cannot be read or a file cannot be copied.
    fn copy_tree(
        &self,
        source: &Path,
        dest: &Path,
        filter: &IncludeFilter,
    ) -> Result<usize, NodeError>;

    /// Lists files under `dir` matching `filter`, sorted by path
    ///
    /// # Errors
    ///
    /// Returns [`NodeError`] if the directory cannot be read.
    fn list_matching(&self, dir: &Path, filter: &IncludeFilter)
    -> Result<Vec<PathBuf>, NodeError>;

    /// Copies a file keeping its permissions and modification time
    ///
    /// # Errors
    ///
    /// Returns [`NodeError`] if the copy or the metadata update fails.
    fn copy_with_permissions(&self, from: &Path, to: &Path) -> Result<(), NodeError>;

    /// Renders `path` the way the node sees it
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::Unresolvable`] if the node cannot locate the path.
    fn resolve(&self, path: &Path) -> Result<PathBuf, NodeError>;

    /// Resolves every path in `paths`, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first [`NodeError`] raised by [`NodeChannel::resolve`].
    fn resolve_all(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, NodeError> {
        paths.iter().map(|p| self.resolve(p)).collect()
    }
}

/// A machine a build can run on
#[derive(Debug, Clone)]
pub struct AgentNode {
    /// Node name as shown in the build log
    pub name: String,

    /// Active channel, `None` while the node is offline
    channel: Option<Arc<dyn NodeChannel>>,
}

impl AgentNode {
    /// Creates a node reachable through `channel`
    pub fn new(name: impl Into<String>, channel: Arc<dyn NodeChannel>) -> Self {
        Self {
            name: name.into(),
            channel: Some(channel),
        }
    }

    /// The controller's own file system
    #[must_use]
    pub fn local() -> Self {
        Self::new("built-in", Arc::new(LocalChannel::new()))
    }

    /// A node with no active channel
    pub fn offline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: None,
        }
    }

    /// Returns the channel if the node is online
    #[must_use]
    pub fn channel(&self) -> Option<&dyn NodeChannel> {
        self.channel.as_deref()
    }

    /// Returns true if the node has an active channel
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.channel.is_some()
    }
}

impl fmt::Display for AgentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_node_has_no_channel() {
        let node = AgentNode::offline("agent-7");
        assert!(!node.is_online());
        assert!(node.channel().is_none());
        assert_eq!(node.to_string(), "agent-7");
    }

    #[test]
    fn test_local_node_is_online() {
        let node = AgentNode::local();
        assert!(node.is_online());
        assert_eq!(node.name, "built-in");
    }
}
