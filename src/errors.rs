//! Error types for staging and build properties

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a node channel while operating on its file system
#[derive(Error, Debug)]
pub enum NodeError {
    /// An I/O operation on the node failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path the operation was working on.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path could not be rendered as the node sees it
    #[error("Could not locate the specified file: {path}.")]
    Unresolvable {
        /// The path that could not be resolved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The inclusion filter is not a valid glob
    #[error("Invalid include pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl NodeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can stop the wrapper jar from being staged on a node
#[derive(Error, Debug)]
pub enum StageError {
    /// The node has no active channel
    #[error("Cannot locate the build node '{node}'")]
    NodeOffline {
        /// Name of the offline node.
        node: String,
    },

    /// Copying or listing on the node failed
    #[error(transparent)]
    Node(#[from] NodeError),

    /// Nothing matching the inclusion filter landed in the destination
    #[error("No artifact matching '{pattern}' found in {dir}")]
    NoArtifact {
        /// Destination directory that was listed.
        dir: PathBuf,
        /// Inclusion filter used for the listing.
        pattern: String,
    },

    /// More than one candidate artifact and the selection requires exactly one
    #[error("Expected exactly one artifact in {dir}, found {count}")]
    AmbiguousArtifact {
        /// Destination directory that was listed.
        dir: PathBuf,
        /// Number of candidates found.
        count: usize,
    },

    /// The artifact's file name does not fit the stable-name pattern
    #[error("Artifact name '{name}' does not match pattern '{pattern}'")]
    UnmatchedArtifactName {
        /// The artifact file name.
        name: String,
        /// The substitution pattern.
        pattern: String,
    },
}

/// Errors from the build properties store
#[derive(Error, Debug)]
pub enum PropertiesError {
    /// The file or its directory does not exist
    #[error("{path} (No such file or directory)")]
    NotFound {
        /// Path of the properties file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure
    #[error("{path}: {source}")]
    Io {
        /// Path of the properties file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid properties syntax
    #[error("Malformed properties at line {line}: {reason}")]
    Parse {
        /// 1-based line the bad entry starts on.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// The build storage directory has no parent to hold the file
    #[error("Build directory {path} has no parent directory")]
    NoJobDirectory {
        /// The build storage directory.
        path: PathBuf,
    },
}

impl PropertiesError {
    /// Classifies an I/O error on `path` into `NotFound` or `Io`
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path, source }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Errors in loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::Config`]
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A pattern in the artifact section is invalid
    #[error("Invalid {field}: {reason}")]
    InvalidPattern {
        /// Name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
