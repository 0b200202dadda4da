//! Decision conversation domain.
//!
//! Pure logic for one decision session: the question set, the session
//! entity and its phase machine, the verdict scoring contract, and the
//! prompts sent to the language model. No I/O lives here.

mod errors;
mod message;
mod phase;
pub mod prompts;
mod questions;
mod session;
mod verdict;

pub use errors::{ConversationError, Gateway, APOLOGY_MESSAGE, REPROMPT_MESSAGE};
pub use message::UserMessage;
pub use phase::ConversationPhase;
pub use questions::{ParsedQuestions, QuestionSet, FALLBACK_QUESTION, QUESTION_COUNT};
pub use session::DecisionSession;
pub use verdict::{
    apply_rubric, Dimension, ScoreCard, VerdictOutcome, VerdictReport, GOOD_THRESHOLD,
    HIGH_RISK_THRESHOLD, LOW_SCORE_THRESHOLD, MAX_SCORE, STRONG_BACKUP_THRESHOLD,
};
