use super::format;
use crate::errors::PropertiesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::io::{self, Write};

/// Flat string-to-string mapping handed from one build step to another
///
/// Keys are kept sorted so stored files are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Creates an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets a value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses raw file bytes, decoding them as ISO-8859-1
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError::Parse`] on a malformed `\uXXXX` escape.
    pub fn from_latin1(bytes: &[u8]) -> Result<Self, PropertiesError> {
        let text: String = bytes.iter().map(|&b| char::from(b)).collect();
        format::parse(&text)
    }

    /// Writes the mapping in `.properties` format
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn store<W: Write>(&self, writer: &mut W, comment: Option<&str>) -> io::Result<()> {
        format::store(self, writer, comment)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut properties = Properties::new();
        assert!(properties.is_empty());
        assert_eq!(properties.set("scan_name", "demo"), None);
        assert_eq!(properties.set("scan_name", "demo2"), Some("demo".to_string()));
        assert_eq!(properties.get("scan_name"), Some("demo2"));
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_from_latin1() {
        let properties = Properties::from_latin1(b"name=caf\xe9").unwrap();
        assert_eq!(properties.get("name"), Some("café"));
    }

    #[test]
    fn test_serialize_as_plain_map() {
        let properties: Properties = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&properties).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
