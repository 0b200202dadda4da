//! Mock Context Search for testing.
//!
//! Returns queued results in order, then a fixed default, and records
//! every query it receives.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{ContextSearch, SearchError};

/// Configurable search double.
#[derive(Debug, Clone, Default)]
pub struct MockContextSearch {
    results: Arc<Mutex<VecDeque<Result<String, SearchError>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockContextSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful result.
    pub fn with_result(self, text: impl Into<String>) -> Self {
        self.results.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: SearchError) -> Self {
        self.results.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextSearch for MockContextSearch {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Mock search context".to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_queued_results_then_default() {
        let search = MockContextSearch::new()
            .with_error(SearchError::Network("down".into()))
            .with_result("found it");

        assert!(search.search("q1").await.is_err());
        assert_eq!(search.search("q2").await.unwrap(), "found it");
        assert_eq!(search.search("q3").await.unwrap(), "Mock search context");
        assert_eq!(search.queries(), vec!["q1", "q2", "q3"]);
    }
}
