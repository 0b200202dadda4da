//! SubmitMessage command handler - the decision conversation state machine.
//!
//! One call per user message:
//!
//! 1. No session for the key: the message is the decision statement. Questions
//!    are generated, the session is created and question 1 is returned.
//! 2. Answers 1-5: the answer is recorded and the next question returned.
//! 3. Answer 6: the verdict is evaluated, the session deleted and the verdict
//!    returned.
//!
//! Blank input is answered with a re-prompt before any state is touched. A
//! failed model call leaves the stored session exactly as it was.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::domain::decision::{
    ConversationError, DecisionSession, Gateway, UserMessage, VerdictOutcome, APOLOGY_MESSAGE,
    FALLBACK_QUESTION, REPROMPT_MESSAGE,
};
use crate::domain::foundation::{SessionKey, ValidationError};
use crate::ports::{AIError, SessionStore, SessionStoreError};

use super::{QuestionGenerator, SessionLocks, VerdictEvaluator};

/// Command to submit the next user message of a conversation.
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    pub session_key: SessionKey,
    pub message: String,
}

impl SubmitMessageCommand {
    pub fn new(session_key: SessionKey, message: impl Into<String>) -> Self {
        Self {
            session_key,
            message: message.into(),
        }
    }
}

/// Reply for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnReply {
    /// The next clarifying question, numbered from 1.
    Question { number: usize, text: String },
    /// The final report. The session no longer exists.
    Verdict {
        outcome: Option<VerdictOutcome>,
        text: String,
    },
    /// The message was blank; nothing changed.
    Reprompt,
}

impl TurnReply {
    /// Text to show the user.
    pub fn text(&self) -> &str {
        match self {
            TurnReply::Question { text, .. } | TurnReply::Verdict { text, .. } => text,
            TurnReply::Reprompt => REPROMPT_MESSAGE,
        }
    }

    pub fn is_verdict(&self) -> bool {
        matches!(self, TurnReply::Verdict { .. })
    }
}

/// Errors that abort a turn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitMessageError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Session state is inconsistent: {0}")]
    InvalidState(#[from] ValidationError),
}

impl SubmitMessageError {
    /// Plain-text reply for the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitMessageError::Conversation(err) => err.user_message(),
            SubmitMessageError::InvalidState(_) => APOLOGY_MESSAGE,
        }
    }
}

impl From<AIError> for SubmitMessageError {
    fn from(err: AIError) -> Self {
        ConversationError::gateway(Gateway::LanguageModel, err.to_string()).into()
    }
}

impl From<SessionStoreError> for SubmitMessageError {
    fn from(err: SessionStoreError) -> Self {
        ConversationError::Storage(err.to_string()).into()
    }
}

/// Handler for SubmitMessage commands.
pub struct SubmitMessageHandler {
    store: Arc<dyn SessionStore>,
    questions: QuestionGenerator,
    evaluator: VerdictEvaluator,
    locks: Arc<SessionLocks>,
}

impl SubmitMessageHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        questions: QuestionGenerator,
        evaluator: VerdictEvaluator,
    ) -> Self {
        Self {
            store,
            questions,
            evaluator,
            locks: Arc::new(SessionLocks::new()),
        }
    }

    /// Shares a lock table, e.g. with the sweeper.
    pub fn with_locks(mut self, locks: Arc<SessionLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn locks(&self) -> &Arc<SessionLocks> {
        &self.locks
    }

    /// Handles one turn.
    pub async fn handle(&self, cmd: SubmitMessageCommand) -> Result<TurnReply, SubmitMessageError> {
        let key = cmd.session_key;
        let message = match UserMessage::parse(&cmd.message) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(session = %key, error = %err, "Re-prompting for input");
                return Ok(TurnReply::Reprompt);
            }
        };

        let guard = self.locks.acquire(&key).await;
        let reply = match self.store.get(&key).await? {
            None => self.start(key, message).await,
            Some(session) if session.awaits_final_answer() => self.finish(session, message).await,
            Some(session) => self.advance(session, message).await,
        };
        drop(guard);

        if matches!(reply, Ok(TurnReply::Verdict { .. })) {
            self.locks.prune();
        }
        reply
    }

    /// Handles one turn and always yields text, the apology on failure.
    pub async fn respond(&self, session_key: SessionKey, message: &str) -> String {
        let cmd = SubmitMessageCommand::new(session_key.clone(), message);
        match self.handle(cmd).await {
            Ok(reply) => reply.text().to_string(),
            Err(err) => {
                tracing::error!(session = %session_key, error = %err, "Turn failed");
                err.user_message().to_string()
            }
        }
    }

    async fn start(
        &self,
        key: SessionKey,
        statement: UserMessage,
    ) -> Result<TurnReply, SubmitMessageError> {
        let questions = self.questions.generate(&key, &statement).await?;
        let session = DecisionSession::start(key, statement, questions);
        let first = question_at(&session);

        self.store.create(session.clone()).await?;
        tracing::info!(session = %session.key(), "Decision session started");

        Ok(TurnReply::Question {
            number: 1,
            text: first,
        })
    }

    async fn advance(
        &self,
        mut session: DecisionSession,
        answer: UserMessage,
    ) -> Result<TurnReply, SubmitMessageError> {
        session.record_answer(answer)?;
        let next = question_at(&session);
        let number = session.cursor() + 1;

        self.store.update(session.clone()).await?;
        tracing::debug!(session = %session.key(), cursor = session.cursor(), "Answer recorded");

        Ok(TurnReply::Question { number, text: next })
    }

    async fn finish(
        &self,
        mut session: DecisionSession,
        answer: UserMessage,
    ) -> Result<TurnReply, SubmitMessageError> {
        // the stored copy is only touched once the verdict exists
        session.record_answer(answer)?;
        let evaluation = self
            .evaluator
            .evaluate(session.key(), session.statement(), session.answers())
            .await?;

        self.store.delete(session.key()).await?;
        tracing::info!(
            session = %session.key(),
            outcome = ?evaluation.report.outcome(),
            elapsed_secs = (Utc::now() - session.created_at()).num_seconds(),
            "Decision session completed"
        );

        Ok(TurnReply::Verdict {
            outcome: evaluation.report.outcome(),
            text: evaluation.text,
        })
    }
}

fn question_at(session: &DecisionSession) -> String {
    session
        .current_question()
        .unwrap_or(FALLBACK_QUESTION)
        .to_string()
}
