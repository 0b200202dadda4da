//! Error kinds for a single conversation turn.
//!
//! None of these are fatal to the process; each is scoped to the turn
//! that raised it.

use std::fmt;

/// Reply shown when the user submits blank text.
pub const REPROMPT_MESSAGE: &str = "Please say something.";

/// Reply shown for any turn that could not be completed.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, something went wrong while processing your message. Please try again.";

/// External service boundary that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gateway {
    LanguageModel,
    ContextSearch,
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gateway::LanguageModel => write!(f, "language model"),
            Gateway::ContextSearch => write!(f, "context search"),
        }
    }
}

/// Conversation domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error("Message is empty")]
    EmptyInput,

    #[error("The {gateway} gateway is unavailable: {reason}")]
    GatewayUnavailable { gateway: Gateway, reason: String },

    #[error("Malformed model output: expected {expected} items, found {found}")]
    MalformedModelOutput { expected: usize, found: usize },

    #[error("Session storage failed: {0}")]
    Storage(String),
}

impl ConversationError {
    /// Creates a gateway unavailable error.
    pub fn gateway(gateway: Gateway, reason: impl Into<String>) -> Self {
        Self::GatewayUnavailable {
            gateway,
            reason: reason.into(),
        }
    }

    /// Returns true if the turn can carry on without the caller retrying.
    pub fn is_recovered_locally(&self) -> bool {
        matches!(
            self,
            ConversationError::EmptyInput | ConversationError::MalformedModelOutput { .. }
        )
    }

    /// Plain-text reply to show the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConversationError::EmptyInput => REPROMPT_MESSAGE,
            _ => APOLOGY_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_reprompts() {
        assert_eq!(ConversationError::EmptyInput.user_message(), REPROMPT_MESSAGE);
        assert!(ConversationError::EmptyInput.is_recovered_locally());
    }

    #[test]
    fn gateway_failure_apologizes() {
        let err = ConversationError::gateway(Gateway::LanguageModel, "timed out");
        assert_eq!(err.user_message(), APOLOGY_MESSAGE);
        assert!(!err.is_recovered_locally());
        assert_eq!(
            err.to_string(),
            "The language model gateway is unavailable: timed out"
        );
    }

    #[test]
    fn context_search_failure_names_its_gateway() {
        let err = ConversationError::gateway(Gateway::ContextSearch, "no results");
        assert_eq!(
            err.to_string(),
            "The context search gateway is unavailable: no results"
        );
        assert_eq!(err.user_message(), APOLOGY_MESSAGE);
    }

    #[test]
    fn malformed_output_is_recovered() {
        let err = ConversationError::MalformedModelOutput {
            expected: 6,
            found: 2,
        };
        assert!(err.is_recovered_locally());
        assert!(err.to_string().contains("expected 6 items, found 2"));
    }
}
