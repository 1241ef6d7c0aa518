//! Message catalogs
//!
//! A catalog maps a message code to a template. Templates use `%1` through
//! `%8` for the record's parameters and `%%` for a literal percent sign;
//! any other character after `%` drops the `%` and is copied as text.
//! Parameters may repeat and appear in any order, so a translated catalog can
//! reorder them freely:
//!
//! ```
//! use slot_logger::Catalog;
//!
//! let en = Catalog::new(["%1", "user %1 logged in from %2"]);
//! let de = Catalog::new(["%1", "von %2 angemeldet: %1"]);
//! assert_eq!(en.template(1), Some("user %1 logged in from %2"));
//! assert_eq!(de.len(), en.len());
//! ```
//!
//! An empty template marks a reserved code and is treated like a missing one.

use super::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    templates: Vec<String>,
}

impl Catalog {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
        }
    }

    /// Template for `code`, or `None` if the code is out of range or reserved
    pub fn template(&self, code: u32) -> Option<&str> {
        self.templates
            .get(code as usize)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn contains(&self, code: u32) -> bool {
        self.template(code).is_some()
    }

    /// Number of codes, reserved ones included
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Parse a catalog from a JSON array of strings
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<S: Into<String>> FromIterator<S> for Catalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;

    #[test]
    fn test_lookup() {
        let catalog = Catalog::new(["%1", "", "a:%1"]);
        assert_eq!(catalog.template(0), Some("%1"));
        assert_eq!(catalog.template(1), None);
        assert_eq!(catalog.template(2), Some("a:%1"));
        assert_eq!(catalog.template(3), None);
        assert_eq!(catalog.template(u32::MAX), None);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.contains(1));
    }

    #[test]
    fn test_json_roundtrip() {
        let catalog: Catalog = ["%1", "s:%1, percent:%%", ""].into_iter().collect();
        let json = catalog.to_json().unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn test_json_rejects_non_strings() {
        let err = Catalog::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages_en.json");
        fs::write(&path, r#"["%1", "started on port %2"]"#).unwrap();

        let catalog = Catalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.template(1), Some("started on port %2"));
        assert!(Catalog::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
