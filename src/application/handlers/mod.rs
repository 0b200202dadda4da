//! Application handlers.
//!
//! Command handlers and background services that orchestrate domain operations.

pub mod decision;

pub use decision::{
    // Conversation
    SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler, TurnReply,
    // Collaborators
    Evaluation, ModelSettings, QuestionGenerator, VerdictEvaluator,
    // Session lifecycle
    SessionLocks, SessionSweeper, SessionSweeperConfig,
};
