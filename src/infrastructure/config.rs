//! Configuration management
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual fields.

use crate::errors::ConfigError;
use crate::properties::{PROPERTIES_FILE_NAME, PropertiesStore};
use crate::staging::{
    ArtifactSelection, DEFAULT_INCLUDE_PATTERN, DEFAULT_NAME_PATTERN, DEFAULT_STABLE_NAME,
    StageOptions,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Report staging failures on the build console
pub const ENV_FAIL_BUILD: &str = "SCANSTAGE_FAIL_BUILD";
/// Directory holding the wrapper jar on the controller
pub const ENV_WRAPPER_DIR: &str = "SCANSTAGE_WRAPPER_DIR";
/// Log level used when `RUST_LOG` is unset
pub const ENV_LOG_LEVEL: &str = "SCANSTAGE_LOG_LEVEL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Print staging failures to the build console
    pub fail_build_on_error: bool,
    /// Log level
    pub log_level: String,
    /// Name of the properties handoff file
    pub properties_file_name: String,
    /// Where the wrapper jar lives on the controller
    pub wrapper_dir: Option<PathBuf>,
    /// Wrapper artifact matching
    pub artifact: ArtifactConfig,
}

/// How the wrapper artifact is found and renamed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Glob selecting files to copy
    pub include_pattern: String,
    /// Two-group regex over the artifact file name
    pub name_pattern: String,
    /// Replacement for the first group
    pub stable_name: String,
    /// Choice among several candidates
    pub selection: ArtifactSelection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_build_on_error: false,
            log_level: "info".to_string(),
            properties_file_name: PROPERTIES_FILE_NAME.to_string(),
            wrapper_dir: None,
            artifact: ArtifactConfig::default(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            include_pattern: DEFAULT_INCLUDE_PATTERN.to_string(),
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            stable_name: DEFAULT_STABLE_NAME.to_string(),
            selection: ArtifactSelection::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if given, else defaults, then applies the environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_from(|key| std::env::var(key).ok()))
    }

    /// Applies overrides looked up through `lookup`
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_FAIL_BUILD) {
            match parse_flag(&raw) {
                Some(flag) => self.fail_build_on_error = flag,
                None => tracing::warn!(value = %raw, "Ignoring {ENV_FAIL_BUILD}: not a boolean"),
            }
        }
        if let Some(dir) = lookup(ENV_WRAPPER_DIR).filter(|d| !d.is_empty()) {
            self.wrapper_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|l| !l.is_empty()) {
            self.log_level = level;
        }
        self
    }

    /// Directory holding the wrapper jar on the controller
    ///
    /// Falls back to the directory of the running executable, where the
    /// wrapper is installed alongside this tool.
    #[must_use]
    pub fn wrapper_dir(&self) -> Option<PathBuf> {
        self.wrapper_dir.clone().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
        })
    }

    /// Staging options for this configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if an artifact pattern is invalid.
    pub fn stage_options(&self) -> Result<StageOptions, ConfigError> {
        StageOptions::from_config(self)
    }

    /// Properties store for this configuration
    #[must_use]
    pub fn properties_store(&self) -> PropertiesStore {
        PropertiesStore::new(self.properties_file_name.clone())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
