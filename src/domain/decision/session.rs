//! Decision session entity.
//!
//! One run of the question / answer / verdict protocol. The answers vector
//! only grows, so the cursor is simply its length.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionKey, StateMachine, ValidationError};

use super::{ConversationPhase, QuestionSet, UserMessage};

/// State of a single decision conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSession {
    key: SessionKey,
    statement: String,
    questions: QuestionSet,
    answers: Vec<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl DecisionSession {
    /// Starts a session for a decision statement with its generated questions.
    pub fn start(key: SessionKey, statement: UserMessage, questions: QuestionSet) -> Self {
        let now = Utc::now();
        Self {
            key,
            statement: statement.into_inner(),
            questions,
            answers: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Number of answers recorded so far.
    pub fn cursor(&self) -> usize {
        self.answers.len()
    }

    pub fn phase(&self) -> ConversationPhase {
        ConversationPhase::for_cursor(self.cursor())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// The question whose answer is due, or `None` once all are answered.
    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.cursor())
    }

    /// True when the next answer is the last one.
    pub fn awaits_final_answer(&self) -> bool {
        self.cursor() + 1 == self.questions.len()
    }

    /// Appends an answer and advances the cursor.
    ///
    /// Fails once every question has been answered.
    pub fn record_answer(
        &mut self,
        answer: UserMessage,
    ) -> Result<ConversationPhase, ValidationError> {
        let next = self
            .phase()
            .transition_to(ConversationPhase::for_cursor(self.cursor() + 1))?;
        self.answers.push(answer.into_inner());
        self.last_activity = Utc::now();
        Ok(next)
    }

    /// True when nothing has happened on this session since `cutoff`.
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_activity < cutoff
    }
}
