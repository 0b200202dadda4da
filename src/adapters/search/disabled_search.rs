//! Search backend used when no search credentials are configured.

use async_trait::async_trait;

use crate::ports::{ContextSearch, SearchError};

/// Always reports search as not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSearch;

#[async_trait]
impl ContextSearch for DisabledSearch {
    async fn search(&self, _query: &str) -> Result<String, SearchError> {
        Err(SearchError::NotConfigured)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
