//! Unit loading: identifier → unit name → implementation.
//!
//! The dispatcher never knows where implementations come from. It derives a
//! [`UnitName`] from the identifier (`rmdir_if_exists` →
//! `scall/op/rmdir_if_exists`) and hands it to a [`UnitLoader`].

use std::fmt;
use std::sync::Arc;

use crate::error::{LoadError, ResolveError};
use crate::operation::Operation;

/// Prefix of every derived unit name.
pub const UNIT_PREFIX: &str = "scall/op/";

/// Longest identifier accepted.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Valid identifiers: ASCII lowercase letter first, then lowercase letters,
/// digits or `_`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_lowercase() => {}
        _ => return false,
    }
    name.len() <= MAX_IDENTIFIER_LEN
        && bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Name of the implementation unit for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitName {
    full: String,
}

impl UnitName {
    /// Derive the unit name for `identifier`, rejecting malformed names.
    pub fn derive(identifier: &str) -> Result<Self, ResolveError> {
        if !is_valid_identifier(identifier) {
            return Err(ResolveError::InvalidName(identifier.to_string()));
        }
        Ok(Self { full: format!("{}{}", UNIT_PREFIX, identifier) })
    }

    /// The identifier this unit was derived from.
    pub fn identifier(&self) -> &str {
        &self.full[UNIT_PREFIX.len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Makes the implementation named by a unit available.
///
/// Loading the same unit twice must be side-effect free; the registry
/// still serializes loads per identifier.
pub trait UnitLoader: Send + Sync {
    fn load(&self, unit: &UnitName) -> Result<Arc<dyn Operation>, LoadError>;

    /// Identifiers this loader can provide, if it can enumerate them.
    fn available(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        assert!(is_valid_identifier("open"));
        assert!(is_valid_identifier("rmdir_if_exists"));
        assert!(is_valid_identifier("dup2"));
    }

    #[test]
    fn invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("_open"));
        assert!(!is_valid_identifier("2open"));
        assert!(!is_valid_identifier("Open"));
        assert!(!is_valid_identifier("../open"));
        assert!(!is_valid_identifier("open file"));
        assert!(!is_valid_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)));
    }

    #[test]
    fn derive_unit_name() {
        let unit = UnitName::derive("mkdir_if_missing").expect("valid");
        assert_eq!(unit.as_str(), "scall/op/mkdir_if_missing");
        assert_eq!(unit.identifier(), "mkdir_if_missing");
    }

    #[test]
    fn derive_rejects_bad_name() {
        assert_eq!(
            UnitName::derive("Rm -rf"),
            Err(ResolveError::InvalidName("Rm -rf".to_string()))
        );
    }
}
