//! Decision conversation handlers.

mod question_generator;
mod session_locks;
mod session_sweeper;
mod submit_message;
mod verdict_evaluator;

pub use question_generator::{ModelSettings, QuestionGenerator};
pub use session_locks::SessionLocks;
pub use session_sweeper::{SessionSweeper, SessionSweeperConfig};
pub use submit_message::{
    SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler, TurnReply,
};
pub use verdict_evaluator::{Evaluation, VerdictEvaluator};
