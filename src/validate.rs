//! Module name validation.
//!
//! Only names that look like plain public Python identifiers are ever
//! handed to the package manager. [`ModuleName`] can only be built through
//! the validator, so the installer cannot be given an unchecked name.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{ImportScanError, Result};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check whether `name` is an installable module name.
///
/// Accepts identifier-like names and rejects anything starting with `_`.
pub fn is_valid_module_name(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !name.starts_with('_')
}

/// A module name that passed [`is_valid_module_name`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// Validate `name`, returning `None` if it is rejected.
    pub fn parse(name: &str) -> Option<Self> {
        is_valid_module_name(name).then(|| Self(name.to_string()))
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ModuleName {
    type Error = ImportScanError;

    fn try_from(name: &str) -> Result<Self> {
        Self::parse(name).ok_or_else(|| ImportScanError::InvalidModuleName {
            name: name.to_string(),
        })
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["requests", "numpy", "PIL", "yaml2", "a", "snake_case_pkg"] {
            assert!(is_valid_module_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_leading_underscore() {
        for name in ["_", "_private", "__future__", "_ssl"] {
            assert!(!is_valid_module_name(name), "{name} should be rejected");
        }
    }

    #[test]
    fn rejects_characters_outside_identifier_set() {
        for name in ["os,", "my-pkg", "foo.bar", "9lives", "", "caf\u{e9}", "a b", "x;rm"] {
            assert!(!is_valid_module_name(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn validation_is_stable_across_calls() {
        for name in ["requests", "_private", "os,"] {
            assert_eq!(is_valid_module_name(name), is_valid_module_name(name));
        }
    }

    #[test]
    fn module_name_parse_follows_validator() {
        assert_eq!(ModuleName::parse("requests").unwrap().as_str(), "requests");
        assert!(ModuleName::parse("_private").is_none());
    }

    #[test]
    fn module_name_try_from_reports_invalid_name() {
        let err = ModuleName::try_from("bad-name").unwrap_err();
        assert!(matches!(err, ImportScanError::InvalidModuleName { name } if name == "bad-name"));
    }

    #[test]
    fn module_name_serializes_as_plain_string() {
        let name = ModuleName::parse("flask").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"flask\"");
    }
}
