//! Clarification question set.
//!
//! The model is asked for a numbered list; whatever comes back is coerced
//! into exactly [`QUESTION_COUNT`] questions. Short replies are padded with
//! [`FALLBACK_QUESTION`], long ones truncated.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::ConversationError;

/// Number of clarification questions asked per session.
pub const QUESTION_COUNT: usize = 6;

/// Filler used when the model produced fewer than [`QUESTION_COUNT`] questions.
pub const FALLBACK_QUESTION: &str = "Please provide more details related to this decision.";

/// Exactly six ordered, non-empty clarification questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct QuestionSet(Vec<String>);

/// Result of coercing raw model output into a [`QuestionSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestions {
    pub questions: QuestionSet,
    /// Number of usable numbered lines found before padding or truncation.
    pub candidates: usize,
}

impl ParsedQuestions {
    /// Describes how the model output missed the expected shape, if it did.
    pub fn malformation(&self) -> Option<ConversationError> {
        (self.candidates != QUESTION_COUNT).then_some(ConversationError::MalformedModelOutput {
            expected: QUESTION_COUNT,
            found: self.candidates,
        })
    }
}

impl QuestionSet {
    /// Builds a set from exactly six non-empty questions.
    pub fn new(questions: Vec<String>) -> Result<Self, ValidationError> {
        if questions.len() != QUESTION_COUNT {
            return Err(ValidationError::out_of_range(
                "questions",
                QUESTION_COUNT as i32,
                QUESTION_COUNT as i32,
                questions.len() as i32,
            ));
        }
        if questions.iter().any(|q| q.trim().is_empty()) {
            return Err(ValidationError::empty_field("question"));
        }
        Ok(Self(questions))
    }

    /// Parses a numbered list out of free-form model text.
    ///
    /// A line is a candidate when its first non-whitespace character is a
    /// digit. The question is whatever follows the first `.` on that line
    /// (or the whole line when there is no `.`), trimmed. Candidates that
    /// trim to nothing are dropped.
    pub fn from_model_output(raw: &str) -> ParsedQuestions {
        let mut questions: Vec<String> = raw
            .lines()
            .filter_map(question_candidate)
            .map(str::to_string)
            .collect();
        let candidates = questions.len();

        questions.truncate(QUESTION_COUNT);
        questions.resize(QUESTION_COUNT, FALLBACK_QUESTION.to_string());

        ParsedQuestions {
            questions: Self(questions),
            candidates,
        }
    }

    /// Question at `index` (0-based).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for QuestionSet {
    type Error = ValidationError;

    fn try_from(questions: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionSet> for Vec<String> {
    fn from(set: QuestionSet) -> Self {
        set.0
    }
}

fn question_candidate(line: &str) -> Option<&str> {
    let line = line.trim();
    if !line.chars().next()?.is_ascii_digit() {
        return None;
    }
    let text = match line.split_once('.') {
        Some((_, rest)) => rest.trim(),
        None => line,
    };
    (!text.is_empty()).then_some(text)
}
