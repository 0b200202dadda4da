//! User message value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ConversationError;

/// A non-blank message submitted by the user, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserMessage(String);

impl UserMessage {
    /// Parses raw transport text, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, ConversationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConversationError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
