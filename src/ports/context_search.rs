//! Context Search Port - Interface for real-world context enrichment.
//!
//! Search is best-effort: a failed lookup never fails a verdict. Callers
//! convert the outcome into a [`SearchContext`] so that the placeholder
//! substitution is an explicit, testable value rather than a swallowed error.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Port for supplementary web search.
#[async_trait]
pub trait ContextSearch: Send + Sync {
    /// Returns text describing real-world context for `query`.
    async fn search(&self, query: &str) -> Result<String, SearchError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Search backend errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search is not configured")]
    NotConfigured,

    #[error("search timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("network error: {0}")]
    Network(String),

    #[error("search returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no results")]
    NoResults,
}

impl SearchError {
    /// Timeout error for `limit`, rounded up to whole seconds.
    pub fn timeout(limit: Duration) -> Self {
        SearchError::Timeout {
            timeout_secs: super::timeout_secs(limit),
        }
    }
}

/// Outcome of a context lookup as it enters the scoring prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchContext {
    /// Search succeeded with this text.
    Found(String),
    /// Search failed; carries the reason.
    Unavailable(String),
}

impl SearchContext {
    /// Converts a raw search result, replacing any failure with a marker.
    pub fn from_result(result: Result<String, SearchError>) -> Self {
        match result {
            Ok(text) if !text.trim().is_empty() => SearchContext::Found(text),
            Ok(_) => SearchContext::Unavailable(SearchError::NoResults.to_string()),
            Err(e) => SearchContext::Unavailable(e.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SearchContext::Found(_))
    }

    /// Text embedded in the scoring prompt.
    pub fn prompt_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchContext::Found(text) => write!(f, "{}", text),
            SearchContext::Unavailable(reason) => {
                write!(f, "No external data available ({})", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_passes_text_through() {
        let ctx = SearchContext::from_result(Ok("Median runway is 18 months.".to_string()));
        assert!(ctx.is_available());
        assert_eq!(ctx.prompt_text(), "Median runway is 18 months.");
    }

    #[test]
    fn failure_becomes_marked_placeholder() {
        let ctx = SearchContext::from_result(Err(SearchError::Timeout { timeout_secs: 15 }));
        assert!(!ctx.is_available());
        assert_eq!(
            ctx.prompt_text(),
            "No external data available (search timed out after 15s)"
        );
    }

    #[test]
    fn sub_second_timeout_reports_at_least_one_second() {
        assert_eq!(
            SearchError::timeout(Duration::from_millis(20)).to_string(),
            "search timed out after 1s"
        );
        assert_eq!(
            SearchError::timeout(Duration::from_millis(1500)),
            SearchError::Timeout { timeout_secs: 2 }
        );
        assert_eq!(
            SearchError::timeout(Duration::from_secs(15)),
            SearchError::Timeout { timeout_secs: 15 }
        );
    }

    #[test]
    fn blank_result_counts_as_unavailable() {
        let ctx = SearchContext::from_result(Ok("  \n".to_string()));
        assert_eq!(ctx, SearchContext::Unavailable("no results".to_string()));
    }
}
