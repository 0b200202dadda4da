//! VerdictEvaluator - scores a completed session and produces the verdict text.
//!
//! Context search is best-effort: any failure (including a timeout) is turned
//! into a [`SearchContext::Unavailable`] marker and the verdict proceeds.
//! Only the language model call can fail an evaluation.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::decision::{prompts, ConversationError, Gateway, VerdictReport};
use crate::domain::foundation::SessionKey;
use crate::ports::{AIError, AIProvider, ContextSearch, RequestPurpose, SearchContext, SearchError};

use super::ModelSettings;

/// A finished evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Parsed view of the model reply.
    pub report: VerdictReport,
    /// Context that went into the scoring prompt.
    pub context: SearchContext,
    /// Text to show the user.
    pub text: String,
}

/// Produces the scored verdict for a statement and its six answers.
pub struct VerdictEvaluator {
    ai_provider: Arc<dyn AIProvider>,
    search: Arc<dyn ContextSearch>,
    settings: ModelSettings,
    search_timeout: Duration,
    enforce_rubric: bool,
}

impl VerdictEvaluator {
    /// Creates an evaluator with rubric enforcement on and a 15s search timeout.
    pub fn new(ai_provider: Arc<dyn AIProvider>, search: Arc<dyn ContextSearch>) -> Self {
        Self {
            ai_provider,
            search,
            settings: ModelSettings::default(),
            search_timeout: Duration::from_secs(15),
            enforce_rubric: true,
        }
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// When off, the model's reply is returned verbatim.
    pub fn with_rubric_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_rubric = enforce;
        self
    }

    pub async fn evaluate(
        &self,
        key: &SessionKey,
        statement: &str,
        answers: &[String],
    ) -> Result<Evaluation, AIError> {
        let context = self.lookup_context(key, statement).await;

        let request = self.settings.request(
            key,
            RequestPurpose::Verdict,
            prompts::verdict_prompt(statement, answers, &context.prompt_text()),
        );
        let response = self.ai_provider.complete(request).await?;
        let report = VerdictReport::from_model_output(response.content);

        let text = if self.enforce_rubric {
            self.enforce(key, &report)
        } else {
            report.raw().to_string()
        };

        Ok(Evaluation {
            report,
            context,
            text,
        })
    }

    async fn lookup_context(&self, key: &SessionKey, statement: &str) -> SearchContext {
        let result = match tokio::time::timeout(self.search_timeout, self.search.search(statement))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SearchError::timeout(self.search_timeout)),
        };

        let context = SearchContext::from_result(result);
        if let SearchContext::Unavailable(reason) = &context {
            let error = ConversationError::gateway(Gateway::ContextSearch, reason.as_str());
            tracing::warn!(
                session = %key,
                backend = self.search.name(),
                error = %error,
                "Context search unavailable, continuing without it"
            );
        }
        context
    }

    fn enforce(&self, key: &SessionKey, report: &VerdictReport) -> String {
        match (report.scores(), report.stated_outcome()) {
            (None, stated) => {
                tracing::warn!(
                    session = %key,
                    stated = ?stated,
                    "Verdict scores could not be parsed, keeping the model's verdict"
                );
            }
            (Some(_), stated) if report.overrides_model() => {
                tracing::warn!(
                    session = %key,
                    stated = ?stated,
                    computed = ?report.computed_outcome(),
                    "Model verdict disagrees with its scores, applying rubric"
                );
            }
            _ => {}
        }
        report.render()
    }
}
