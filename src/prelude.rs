//! Prelude module for common imports

pub use crate::errors::{NodeError, PropertiesError, StageError};
pub use crate::infrastructure::{BuildLog, Config};
pub use crate::node::{AgentNode, IncludeFilter, LocalChannel, NodeChannel};
pub use crate::properties::{BuildRecord, Properties, PropertiesStore};
pub use crate::staging::{ArtifactSelection, ArtifactStager, StageOptions, StagedArtifact};
