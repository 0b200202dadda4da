//! QuestionGenerator - turns a decision statement into six clarifying questions.

use std::sync::Arc;

use crate::domain::decision::{prompts, QuestionSet, UserMessage};
use crate::domain::foundation::SessionKey;
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

/// Sampling settings shared by both model calls of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_output_tokens: 2048,
        }
    }
}

impl ModelSettings {
    /// Builds a request carrying `prompt` as the single user message.
    pub(crate) fn request(
        &self,
        key: &SessionKey,
        purpose: RequestPurpose,
        prompt: String,
    ) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(key.clone(), purpose))
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_output_tokens)
    }
}

/// Generates the clarification questions for a new session.
pub struct QuestionGenerator {
    ai_provider: Arc<dyn AIProvider>,
    settings: ModelSettings,
}

impl QuestionGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            ai_provider,
            settings: ModelSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Asks the model for questions and coerces the reply to exactly six.
    ///
    /// Malformed output is padded or truncated, never rejected. Gateway
    /// failures are returned unchanged.
    pub async fn generate(
        &self,
        key: &SessionKey,
        statement: &UserMessage,
    ) -> Result<QuestionSet, AIError> {
        let request = self.settings.request(
            key,
            RequestPurpose::Questions,
            prompts::question_prompt(statement.as_str()),
        );

        let response = self.ai_provider.complete(request).await?;
        let parsed = QuestionSet::from_model_output(&response.content);

        if let Some(malformed) = parsed.malformation() {
            tracing::warn!(
                session = %key,
                candidates = parsed.candidates,
                error = %malformed,
                "Question list coerced to six entries"
            );
        } else {
            tracing::debug!(session = %key, "Generated clarifying questions");
        }

        Ok(parsed.questions)
    }
}
