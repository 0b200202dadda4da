//! Conversation phase state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

use super::QUESTION_COUNT;

/// Where a conversation stands.
///
/// `AwaitingAnswer(n)` means question `n` (1-based) has been shown and
/// its answer is due next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", content = "question", rename_all = "snake_case")]
pub enum ConversationPhase {
    AwaitingProblem,
    AwaitingAnswer(u8),
    Completed,
}

impl ConversationPhase {
    /// Phase of a live session whose cursor (answers recorded) is `cursor`.
    pub fn for_cursor(cursor: usize) -> Self {
        if cursor < QUESTION_COUNT {
            ConversationPhase::AwaitingAnswer(cursor as u8 + 1)
        } else {
            ConversationPhase::Completed
        }
    }
}

impl StateMachine for ConversationPhase {
    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationPhase::*;
        match *self {
            AwaitingProblem => vec![AwaitingAnswer(1)],
            AwaitingAnswer(n) if (n as usize) < QUESTION_COUNT => vec![AwaitingAnswer(n + 1)],
            AwaitingAnswer(_) => vec![Completed],
            Completed => vec![],
        }
    }
}
