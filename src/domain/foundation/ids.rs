//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// External identifier for one decision conversation.
///
/// The transport owns the mapping from a caller to a key; the core only
/// requires that keys are non-empty and stable across turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a SessionKey, returning error if blank.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::empty_field("session_key"));
        }
        Ok(Self(key))
    }

    /// Generates a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_rejects_blank() {
        assert!(SessionKey::new("").is_err());
        assert!(SessionKey::new("   ").is_err());
    }

    #[test]
    fn session_key_keeps_value() {
        let key = SessionKey::new("browser-42").unwrap();
        assert_eq!(key.as_str(), "browser-42");
        assert_eq!(key.to_string(), "browser-42");
    }

    #[test]
    fn generated_keys_are_distinct_uuids() {
        let a = SessionKey::generate();
        let b = SessionKey::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn session_key_parses_from_str() {
        let key: SessionKey = "abc".parse().unwrap();
        assert_eq!(key, SessionKey::new("abc").unwrap());
        assert!("".parse::<SessionKey>().is_err());
    }

    #[test]
    fn session_key_serializes_transparently() {
        let key = SessionKey::new("k-1").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"k-1\"");
    }
}
