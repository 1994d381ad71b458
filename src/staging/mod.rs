//! Wrapper staging
//!
//! Copies the scanner wrapper onto the node a build runs on and gives it a
//! name that does not change between wrapper releases.

mod artifact;
mod stager;

pub use artifact::{
    ArtifactSelection, DEFAULT_INCLUDE_PATTERN, DEFAULT_NAME_PATTERN, DEFAULT_STABLE_NAME,
    StableNamer,
};
pub use stager::{ArtifactStager, STAGE_FAILURE_MESSAGE, StageOptions, StagedArtifact};
