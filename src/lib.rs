//! # scanstage - wrapper staging and build property handoff
//!
//! Two small building blocks for CI build steps that drive an external
//! scanner:
//!
//! - **Staging**: copy the scanner's wrapper jar onto the node a build runs
//!   on, then add a copy under a fixed name so later steps never need to know
//!   the wrapper's version.
//! - **Build properties**: a one-shot `.properties` file stored beside a
//!   job's build directories, written by one step and consumed by the next.
//!
//! The CI host is kept behind [`NodeChannel`] (file operations on a node) and
//! [`BuildRecord`] (where a build is stored). Build console output goes to a
//! [`BuildLog`].
//!
//! ## Example
//!
//! ```rust
//! use scanstage::prelude::*;
//! use tempfile::TempDir;
//!
//! let jobs = TempDir::new().unwrap();
//! let build = BuildRecord::for_job(jobs.path(), "app", 42);
//! std::fs::create_dir_all(build.storage_dir()).unwrap();
//!
//! let store = PropertiesStore::default();
//! let mut console = Vec::new();
//! let properties: Properties = [("scan_name", "demo")].into_iter().collect();
//!
//! store.write(&build, &properties, &mut console).unwrap();
//! assert_eq!(store.read(&build, &mut console), Some(properties));
//! assert_eq!(store.read(&build, &mut console), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod errors;
pub mod infrastructure;
pub mod node;
pub mod properties;
pub mod staging;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use errors::{ConfigError, NodeError, PropertiesError, StageError};
pub use infrastructure::{
    ArtifactConfig, BuildLog, CapturedLog, Config, delete_directory, init_logging,
};
pub use node::{AgentNode, IncludeFilter, LocalChannel, NodeChannel};
pub use properties::{BuildRecord, PROPERTIES_FILE_NAME, Properties, PropertiesStore};
pub use staging::{
    ArtifactSelection, ArtifactStager, StableNamer, StageOptions, StagedArtifact,
};
