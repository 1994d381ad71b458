//! Artifact naming and selection
//!
//! The wrapper jar ships with a versioned file name. Downstream steps invoke
//! it by a fixed name, so staging derives that name with a two-group regex:
//! the first group (the versioned prefix) is replaced by the product name and
//! the second group (the suffix) is kept.

use crate::errors::ConfigError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default inclusion filter for the wrapper jar
pub const DEFAULT_INCLUDE_PATTERN: &str = "**/VeracodeJavaAPI*.jar";

/// Default two-group pattern matched against the artifact's file name
pub const DEFAULT_NAME_PATTERN: &str = r"^(VeracodeJavaAPI.*)(\.jar)$";

/// Fixed product name the versioned prefix is replaced with
pub const DEFAULT_STABLE_NAME: &str = "VeracodeJavaAPI";

static DEFAULT_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_NAME_PATTERN).expect("default name pattern is valid"));

/// How to pick the artifact when the destination holds several candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactSelection {
    /// Take the first candidate in path order
    #[default]
    FirstListed,

    /// Refuse to stage unless exactly one candidate exists
    ExactlyOne,
}

/// Computes stable artifact names
#[derive(Debug, Clone)]
pub struct StableNamer {
    pattern: Regex,
    product: String,
}

impl StableNamer {
    /// Creates a namer from a two-group pattern and a product name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the regex does not compile
    /// or has fewer than two capture groups.
    pub fn new(pattern: &str, product: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            field: "artifact.name_pattern",
            reason: e.to_string(),
        })?;
        // captures_len counts the implicit whole-match group
        if pattern.captures_len() < 3 {
            return Err(ConfigError::InvalidPattern {
                field: "artifact.name_pattern",
                reason: format!("'{pattern}' needs a prefix group and a suffix group"),
            });
        }

        Ok(Self {
            pattern,
            product: product.into(),
        })
    }

    /// Returns the stable name for `file_name`, or `None` if the pattern does
    /// not match
    ///
    /// # Example
    ///
    /// ```rust
    /// use scanstage::StableNamer;
    ///
    /// let namer = StableNamer::default();
    /// assert_eq!(
    ///     namer.stable_name("VeracodeJavaAPI-1.2.3.jar").as_deref(),
    ///     Some("VeracodeJavaAPI.jar")
    /// );
    /// ```
    #[must_use]
    pub fn stable_name(&self, file_name: &str) -> Option<String> {
        if !self.pattern.is_match(file_name) {
            return None;
        }
        let renamed = self.pattern.replace_all(file_name, |caps: &Captures<'_>| {
            format!("{}{}", self.product, caps.get(2).map_or("", |m| m.as_str()))
        });
        Some(renamed.into_owned())
    }

    /// Returns the stable path next to `artifact`
    #[must_use]
    pub fn stable_path(&self, artifact: &Path) -> Option<PathBuf> {
        let file_name = artifact.file_name()?.to_str()?;
        self.stable_name(file_name)
            .map(|name| artifact.with_file_name(name))
    }

    /// Returns true if `path` already carries the stable name
    #[must_use]
    pub fn is_stable(&self, path: &Path) -> bool {
        self.stable_path(path).is_some_and(|stable| stable == path)
    }

    /// The substitution pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for StableNamer {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_NAME_REGEX.clone(),
            product: DEFAULT_STABLE_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_versioned_name_becomes_stable() {
        let namer = StableNamer::default();
        assert_eq!(
            namer.stable_name("VeracodeJavaAPI-1.2.3.jar").as_deref(),
            Some("VeracodeJavaAPI.jar")
        );
        assert_eq!(
            namer.stable_name("VeracodeJavaAPI.jar").as_deref(),
            Some("VeracodeJavaAPI.jar")
        );
        assert_eq!(namer.stable_name("other-1.0.jar"), None);
    }

    #[test]
    fn test_stable_path_keeps_directory() {
        let namer = StableNamer::default();
        assert_eq!(
            namer.stable_path(Path::new("/agent/ws/VeracodeJavaAPI-24.1.0.jar")),
            Some(PathBuf::from("/agent/ws/VeracodeJavaAPI.jar"))
        );
        assert!(namer.is_stable(Path::new("/agent/ws/VeracodeJavaAPI.jar")));
        assert!(!namer.is_stable(Path::new("/agent/ws/VeracodeJavaAPI-24.1.0.jar")));
    }

    #[test]
    fn test_custom_pattern() {
        let namer = StableNamer::new(r"^(scanner)-[0-9.]+(\.zip)$", "scanner").unwrap();
        assert_eq!(
            namer.stable_name("scanner-3.1.zip").as_deref(),
            Some("scanner.zip")
        );
    }

    #[test]
    fn test_pattern_needs_two_groups() {
        let err = StableNamer::new(r"^VeracodeJavaAPI(.*)$", "x").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert!(StableNamer::new(r"(", "x").is_err());
    }

    #[test]
    fn test_selection_serde() {
        let selection: ArtifactSelection = serde_yaml::from_str("exactly-one").unwrap();
        assert_eq!(selection, ArtifactSelection::ExactlyOne);
        assert_eq!(ArtifactSelection::default(), ArtifactSelection::FirstListed);
    }

    proptest! {
        #[test]
        fn prop_stable_name_is_idempotent(version in "[A-Za-z0-9._-]{0,16}") {
            let namer = StableNamer::default();
            let name = format!("VeracodeJavaAPI{version}.jar");
            let once = namer.stable_name(&name).unwrap();
            let twice = namer.stable_name(&once).unwrap();
            prop_assert_eq!(&once, "VeracodeJavaAPI.jar");
            prop_assert_eq!(once, twice);
        }
    }
}
