//! Ant-style inclusion filters over relative paths

use crate::errors::NodeError;
use glob::{MatchOptions, Pattern};
use std::fmt;
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Glob filter applied to paths relative to a copy or listing root
///
/// A leading `**/` also matches files directly under the root, as it does
/// for Ant includes.
///
/// # Example
///
/// ```rust
/// use scanstage::IncludeFilter;
/// use std::path::Path;
///
/// let filter = IncludeFilter::new("**/VeracodeJavaAPI*.jar").unwrap();
/// assert!(filter.matches(Path::new("VeracodeJavaAPI-1.2.3.jar")));
/// assert!(filter.matches(Path::new("lib/VeracodeJavaAPI-1.2.3.jar")));
/// assert!(!filter.matches(Path::new("lib/other.jar")));
/// ```
#[derive(Debug, Clone)]
pub struct IncludeFilter {
    raw: String,
    patterns: Vec<Pattern>,
}

impl IncludeFilter {
    /// Compiles an include pattern
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::InvalidPattern`] if the pattern is not a valid glob.
    pub fn new(pattern: &str) -> Result<Self, NodeError> {
        let compile = |p: &str| {
            Pattern::new(p).map_err(|e| NodeError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })
        };

        let mut patterns = vec![compile(pattern)?];
        if let Some(rest) = pattern.strip_prefix("**/") {
            patterns.push(compile(rest)?);
        }

        Ok(Self {
            raw: pattern.to_string(),
            patterns,
        })
    }

    /// Returns true if `relative` is selected by this filter
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
    }
}

impl fmt::Display for IncludeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
