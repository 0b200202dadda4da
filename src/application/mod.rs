//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    Evaluation, ModelSettings, QuestionGenerator, SessionLocks, SessionSweeper,
    SessionSweeperConfig, SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler,
    TurnReply, VerdictEvaluator,
};
