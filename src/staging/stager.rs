use super::artifact::{ArtifactSelection, DEFAULT_INCLUDE_PATTERN, StableNamer};
use crate::errors::{ConfigError, StageError};
use crate::infrastructure::{BuildLog, Config};
use crate::node::{AgentNode, IncludeFilter, NodeChannel};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

static DEFAULT_FILTER: Lazy<IncludeFilter> = Lazy::new(|| {
    IncludeFilter::new(DEFAULT_INCLUDE_PATTERN).expect("default include pattern is valid")
});

/// Console line printed when staging fails and the build should fail too
pub const STAGE_FAILURE_MESSAGE: &str = "Failed to copy the jarfiles\n";

/// Options for staging the wrapper jar
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Files to copy and to consider as artifacts
    pub filter: IncludeFilter,

    /// Stable name derivation
    pub namer: StableNamer,

    /// Choice among several candidates
    pub selection: ArtifactSelection,

    /// Report failures on the build console
    pub fail_build_on_error: bool,
}

impl StageOptions {
    /// Builds staging options from the artifact section of `config`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if either pattern is invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let artifact = &config.artifact;
        let filter =
            IncludeFilter::new(&artifact.include_pattern).map_err(|e| ConfigError::InvalidPattern {
                field: "artifact.include_pattern",
                reason: e.to_string(),
            })?;
        let namer = StableNamer::new(&artifact.name_pattern, artifact.stable_name.clone())?;

        Ok(Self {
            filter,
            namer,
            selection: artifact.selection,
            fail_build_on_error: config.fail_build_on_error,
        })
    }
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.clone(),
            namer: StableNamer::default(),
            selection: ArtifactSelection::default(),
            fail_build_on_error: false,
        }
    }
}

/// Result of a successful staging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    /// The versioned artifact as copied onto the node
    pub artifact: PathBuf,

    /// The stable-name copy next to it
    pub stable: PathBuf,

    /// Number of files copied from the source tree
    pub copied: usize,
}

/// Stages the scanner wrapper jar onto build nodes
///
/// # Example
///
/// ```rust
/// use scanstage::{AgentNode, ArtifactStager};
/// use tempfile::TempDir;
///
/// let source = TempDir::new().unwrap();
/// let dest = TempDir::new().unwrap();
/// std::fs::write(source.path().join("VeracodeJavaAPI-1.2.3.jar"), b"jar").unwrap();
///
/// let mut console = Vec::new();
/// let staged = ArtifactStager::default()
///     .stage(source.path(), dest.path(), &AgentNode::local(), &mut console)
///     .unwrap();
///
/// assert!(staged.stable.ends_with("VeracodeJavaAPI.jar"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArtifactStager {
    options: StageOptions,
}

impl ArtifactStager {
    /// Creates a stager with the given options
    #[must_use]
    pub fn new(options: StageOptions) -> Self {
        Self { options }
    }

    /// Copies the wrapper from `source` into `dest` on `node` and adds a copy
    /// under the stable name
    ///
    /// Both the versioned artifact and the stable copy are left in `dest`.
    /// On failure the console gets [`STAGE_FAILURE_MESSAGE`] if the options
    /// ask for build failures to be reported.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] describing the first step that failed.
    pub fn stage(
        &self,
        source: &Path,
        dest: &Path,
        node: &AgentNode,
        log: &mut dyn BuildLog,
    ) -> Result<StagedArtifact, StageError> {
        let result = node
            .channel()
            .ok_or_else(|| StageError::NodeOffline {
                node: node.name.clone(),
            })
            .and_then(|channel| self.stage_on(channel, source, dest));

        match &result {
            Ok(staged) => tracing::info!(
                node = %node,
                artifact = %staged.artifact.display(),
                stable = %staged.stable.display(),
                "Staged wrapper"
            ),
            Err(e) => {
                tracing::error!(node = %node, dest = %dest.display(), error = %e, "Staging failed");
                if self.options.fail_build_on_error {
                    log.println(STAGE_FAILURE_MESSAGE);
                }
            }
        }
        result
    }

    fn stage_on(
        &self,
        channel: &dyn NodeChannel,
        source: &Path,
        dest: &Path,
    ) -> Result<StagedArtifact, StageError> {
        let filter = &self.options.filter;
        let copied = channel.copy_tree(source, dest, filter)?;
        tracing::debug!(copied, source = %source.display(), dest = %dest.display(), "Copied wrapper tree");

        let artifact = self.select(channel.list_matching(dest, filter)?, dest)?;

        let namer = &self.options.namer;
        let stable = namer
            .stable_path(&artifact)
            .ok_or_else(|| StageError::UnmatchedArtifactName {
                name: artifact
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                pattern: namer.pattern().to_string(),
            })?;

        if stable != artifact {
            channel.copy_with_permissions(&artifact, &stable)?;
        }

        Ok(StagedArtifact {
            artifact,
            stable,
            copied,
        })
    }

    /// Picks the artifact among listed files, ignoring stable-name copies
    /// left by an earlier staging unless nothing else matched
    fn select(&self, listed: Vec<PathBuf>, dest: &Path) -> Result<PathBuf, StageError> {
        let (stable, mut candidates): (Vec<PathBuf>, Vec<PathBuf>) = listed
            .into_iter()
            .partition(|p| self.options.namer.is_stable(p));
        if candidates.is_empty() {
            candidates = stable;
        }

        match (candidates.len(), self.options.selection) {
            (0, _) => Err(StageError::NoArtifact {
                dir: dest.to_path_buf(),
                pattern: self.options.filter.to_string(),
            }),
            (1, _) => Ok(candidates.swap_remove(0)),
            (count, ArtifactSelection::ExactlyOne) => Err(StageError::AmbiguousArtifact {
                dir: dest.to_path_buf(),
                count,
            }),
            (count, ArtifactSelection::FirstListed) => {
                tracing::warn!(
                    count,
                    chosen = %candidates[0].display(),
                    "Several wrapper artifacts found, using the first"
                );
                Ok(candidates.swap_remove(0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeError;
    use crate::infrastructure::CapturedLog;
    use crate::node::LocalChannel;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn source_with(files: &[(&str, &[u8])]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_stage_creates_stable_copy() {
        let source = source_with(&[("VeracodeJavaAPI-1.2.3.jar", b"wrapper-bytes")]);
        let dest = TempDir::new().unwrap();
        let mut log = CapturedLog::new();

        let staged = ArtifactStager::default()
            .stage(source.path(), dest.path(), &AgentNode::local(), &mut log)
            .unwrap();

        assert_eq!(staged.copied, 1);
        assert_eq!(staged.artifact, dest.path().join("VeracodeJavaAPI-1.2.3.jar"));
        assert_eq!(staged.stable, dest.path().join("VeracodeJavaAPI.jar"));
        assert_eq!(fs::read(&staged.artifact).unwrap(), b"wrapper-bytes");
        assert_eq!(fs::read(&staged.stable).unwrap(), b"wrapper-bytes");
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_stage_nested_artifact_keeps_directory() {
        let source = source_with(&[("lib/VeracodeJavaAPI-2.0.jar", b"nested")]);
        let dest = TempDir::new().unwrap();

        let staged = ArtifactStager::default()
            .stage(source.path(), dest.path(), &AgentNode::local(), &mut CapturedLog::new())
            .unwrap();

        assert_eq!(staged.stable, dest.path().join("lib/VeracodeJavaAPI.jar"));
    }

    #[test]
    fn test_restaging_ignores_previous_stable_copy() {
        let source = source_with(&[("VeracodeJavaAPI-1.2.3.jar", b"v1")]);
        let dest = TempDir::new().unwrap();
        let stager = ArtifactStager::default();
        let node = AgentNode::local();

        stager
            .stage(source.path(), dest.path(), &node, &mut CapturedLog::new())
            .unwrap();
        let again = stager
            .stage(source.path(), dest.path(), &node, &mut CapturedLog::new())
            .unwrap();

        assert_eq!(again.artifact, dest.path().join("VeracodeJavaAPI-1.2.3.jar"));
    }

    #[test]
    fn test_stable_named_wrapper_is_its_own_stable_copy() {
        let source = source_with(&[("VeracodeJavaAPI.jar", b"unversioned")]);
        let dest = TempDir::new().unwrap();
        let channel = Arc::new(RecordingChannel::default());
        let node = AgentNode::new("remote-1", channel.clone());

        let staged = ArtifactStager::default()
            .stage(source.path(), dest.path(), &node, &mut CapturedLog::new())
            .unwrap();

        assert_eq!(staged.artifact, dest.path().join("VeracodeJavaAPI.jar"));
        assert_eq!(staged.stable, staged.artifact);
        assert_eq!(fs::read(&staged.stable).unwrap(), b"unversioned");
        assert_eq!(*channel.calls.lock().unwrap(), ["copy_tree", "list_matching"]);
    }

    #[test]
    fn test_offline_node_reports_when_failing_builds() {
        let source = source_with(&[("VeracodeJavaAPI-1.2.3.jar", b"x")]);
        let dest = TempDir::new().unwrap();
        let stager = ArtifactStager::new(StageOptions {
            fail_build_on_error: true,
            ..StageOptions::default()
        });
        let mut log = CapturedLog::new();

        let err = stager
            .stage(source.path(), dest.path(), &AgentNode::offline("agent-3"), &mut log)
            .unwrap_err();

        assert!(matches!(err, StageError::NodeOffline { ref node } if node == "agent-3"));
        assert!(log.contains("Failed to copy the jarfiles"));
        assert!(!dest.path().join("VeracodeJavaAPI.jar").exists());
    }

    #[test]
    fn test_failure_is_silent_without_flag() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let mut log = CapturedLog::new();

        let err = ArtifactStager::default()
            .stage(source.path(), dest.path(), &AgentNode::local(), &mut log)
            .unwrap_err();

        assert!(matches!(err, StageError::NoArtifact { .. }));
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_first_listed_wins_by_default() {
        let source = source_with(&[
            ("VeracodeJavaAPI-1.0.jar", b"old"),
            ("VeracodeJavaAPI-2.0.jar", b"new"),
        ]);
        let dest = TempDir::new().unwrap();

        let staged = ArtifactStager::default()
            .stage(source.path(), dest.path(), &AgentNode::local(), &mut CapturedLog::new())
            .unwrap();

        assert_eq!(fs::read(staged.stable).unwrap(), b"old");
    }

    #[test]
    fn test_exactly_one_rejects_ambiguity() {
        let source = source_with(&[
            ("VeracodeJavaAPI-1.0.jar", b"old"),
            ("VeracodeJavaAPI-2.0.jar", b"new"),
        ]);
        let dest = TempDir::new().unwrap();
        let stager = ArtifactStager::new(StageOptions {
            selection: ArtifactSelection::ExactlyOne,
            ..StageOptions::default()
        });

        let err = stager
            .stage(source.path(), dest.path(), &AgentNode::local(), &mut CapturedLog::new())
            .unwrap_err();

        assert!(matches!(err, StageError::AmbiguousArtifact { count: 2, .. }));
        assert!(!dest.path().join("VeracodeJavaAPI.jar").exists());
    }

    #[test]
    fn test_name_outside_pattern_is_reported() {
        let source = source_with(&[("VeracodeJavaAPI-1.0.jar", b"x")]);
        let dest = TempDir::new().unwrap();
        let stager = ArtifactStager::new(StageOptions {
            namer: StableNamer::new(r"^(Wrapper.*)(\.jar)$", "Wrapper").unwrap(),
            ..StageOptions::default()
        });

        let err = stager
            .stage(source.path(), dest.path(), &AgentNode::local(), &mut CapturedLog::new())
            .unwrap_err();

        assert!(matches!(err, StageError::UnmatchedArtifactName { .. }));
    }

    /// Local channel that records the order of calls it receives
    #[derive(Debug, Default)]
    struct RecordingChannel {
        inner: LocalChannel,
        calls: Mutex<Vec<&'static str>>,
    }

    impl NodeChannel for RecordingChannel {
        fn copy_tree(
            &self,
            source: &Path,
            dest: &Path,
            filter: &IncludeFilter,
        ) -> Result<usize, NodeError> {
            self.calls.lock().unwrap().push("copy_tree");
            self.inner.copy_tree(source, dest, filter)
        }

        fn list_matching(
            &self,
            dir: &Path,
            filter: &IncludeFilter,
        ) -> Result<Vec<PathBuf>, NodeError> {
            self.calls.lock().unwrap().push("list_matching");
            self.inner.list_matching(dir, filter)
        }

        fn copy_with_permissions(&self, from: &Path, to: &Path) -> Result<(), NodeError> {
            self.calls.lock().unwrap().push("copy_with_permissions");
            self.inner.copy_with_permissions(from, to)
        }

        fn resolve(&self, path: &Path) -> Result<PathBuf, NodeError> {
            self.inner.resolve(path)
        }
    }

    #[test]
    fn test_stage_goes_through_node_channel() {
        let source = source_with(&[("VeracodeJavaAPI-9.jar", b"x")]);
        let dest = TempDir::new().unwrap();
        let channel = Arc::new(RecordingChannel::default());
        let node = AgentNode::new("remote-1", channel.clone());

        ArtifactStager::default()
            .stage(source.path(), dest.path(), &node, &mut CapturedLog::new())
            .unwrap();

        assert_eq!(
            *channel.calls.lock().unwrap(),
            ["copy_tree", "list_matching", "copy_with_permissions"]
        );
    }
}
