//! `scanstage stage` and `scanstage clean` - Put the wrapper on a node, or
//! wipe a staged directory

use anyhow::{Context, Result};
use scanstage::{
    AgentNode, ArtifactSelection, ArtifactStager, Config, LocalChannel, NodeChannel, StagedArtifact,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments of a staging run after CLI parsing
pub struct StageRequest {
    pub source: Option<PathBuf>,
    pub dest: PathBuf,
    pub node: String,
    pub exactly_one: bool,
    pub fail_build: bool,
}

/// Stages the wrapper into `request.dest` through a local channel
///
/// Agents reached this way have their workspace mounted on this machine.
/// The returned paths are resolved by the node's channel.
pub fn stage_wrapper(config: &Config, request: StageRequest) -> Result<StagedArtifact> {
    let mut options = config.stage_options()?;
    if request.exactly_one {
        options.selection = ArtifactSelection::ExactlyOne;
    }
    options.fail_build_on_error |= request.fail_build;

    let source = request
        .source
        .or_else(|| config.wrapper_dir())
        .context("No wrapper directory: pass --source or set SCANSTAGE_WRAPPER_DIR")?;
    let channel: Arc<dyn NodeChannel> = Arc::new(LocalChannel::new());
    let node = AgentNode::new(request.node, Arc::clone(&channel));

    let mut staged = ArtifactStager::new(options)
        .stage(&source, &request.dest, &node, &mut std::io::stderr())
        .with_context(|| {
            format!(
                "Failed to stage wrapper from {} into {}",
                source.display(),
                request.dest.display()
            )
        })?;

    let mut resolved = channel
        .resolve_all(&[staged.artifact.clone(), staged.stable.clone()])
        .context("Failed to resolve the staged wrapper on the node")?
        .into_iter();
    if let (Some(artifact), Some(stable)) = (resolved.next(), resolved.next()) {
        staged.artifact = artifact;
        staged.stable = stable;
    }
    Ok(staged)
}

/// Removes a staged directory; returns false if it did not exist
pub fn clean(dir: &Path) -> Result<bool> {
    scanstage::delete_directory(dir).with_context(|| format!("Failed to delete {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(source: &Path, dest: &Path) -> StageRequest {
        StageRequest {
            source: Some(source.to_path_buf()),
            dest: dest.to_path_buf(),
            node: "built-in".to_string(),
            exactly_one: false,
            fail_build: false,
        }
    }

    #[test]
    fn test_stage_wrapper() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("VeracodeJavaAPI-1.2.3.jar"), b"jar").unwrap();

        let staged = stage_wrapper(&Config::default(), request(source.path(), dest.path())).unwrap();

        assert_eq!(
            staged.stable,
            fs::canonicalize(dest.path().join("VeracodeJavaAPI.jar")).unwrap()
        );
        assert_eq!(
            staged.artifact,
            fs::canonicalize(dest.path().join("VeracodeJavaAPI-1.2.3.jar")).unwrap()
        );
        assert!(staged.stable.is_absolute());
        assert_eq!(fs::read(staged.stable).unwrap(), b"jar");
    }

    #[test]
    fn test_stage_wrapper_exactly_one() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("VeracodeJavaAPI-1.jar"), b"a").unwrap();
        fs::write(source.path().join("VeracodeJavaAPI-2.jar"), b"b").unwrap();

        let mut req = request(source.path(), dest.path());
        req.exactly_one = true;
        let err = stage_wrapper(&Config::default(), req).unwrap_err();

        assert!(err.to_string().contains("Failed to stage wrapper"));
    }

    #[test]
    fn test_clean() {
        let dir = TempDir::new().unwrap();
        let staged = dir.path().join("staged");
        fs::create_dir(&staged).unwrap();

        assert!(clean(&staged).unwrap());
        assert!(!clean(&staged).unwrap());
    }
}
