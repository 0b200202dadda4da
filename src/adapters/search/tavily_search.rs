//! Tavily Search - Implementation of ContextSearch over the Tavily REST API.
//!
//! Results are flattened into bullet lines (`- title (url): snippet`) so
//! they can be dropped straight into the scoring prompt.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{ContextSearch, SearchError};

/// Configuration for the Tavily adapter.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    api_key: Secret<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Maximum results per query.
    pub max_results: u32,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl TavilyConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.tavily.com".to_string(),
            max_results: 4,
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the maximum number of results.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Tavily search client.
pub struct TavilySearch {
    config: TavilyConfig,
    client: Client,
}

impl TavilySearch {
    pub fn new(config: TavilyConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ContextSearch for TavilySearch {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        let body = TavilyRequest {
            query,
            max_results: self.config.max_results,
            search_depth: "basic",
        };

        let response = self
            .client
            .post(self.search_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::timeout(self.config.timeout)
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        parsed.render()
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilyResponse {
    fn render(self) -> Result<String, SearchError> {
        let mut lines = Vec::new();
        if let Some(answer) = self.answer.filter(|a| !a.trim().is_empty()) {
            lines.push(format!("Summary: {}", answer.trim()));
        }
        for result in self.results {
            let snippet = result.content.split_whitespace().collect::<Vec<_>>().join(" ");
            lines.push(format!("- {} ({}): {}", result.title.trim(), result.url, snippet));
        }
        if lines.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_ask_for_four_results() {
        let config = TavilyConfig::new("tvly-key");
        assert_eq!(config.max_results, 4);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(!format!("{:?}", config).contains("tvly-key"));
    }

    #[test]
    fn search_url_trims_trailing_slash() {
        let search =
            TavilySearch::new(TavilyConfig::new("k").with_base_url("https://search.test/")).unwrap();
        assert_eq!(search.search_url(), "https://search.test/search");
    }

    #[test]
    fn results_render_as_bullets() {
        let json = r#"{
            "answer": "Most small businesses fail within five years.",
            "results": [
                {"title": "Startup survival", "url": "https://a.test", "content": "About 20% fail\n in year one."},
                {"title": "Savings runway", "url": "https://b.test", "content": "Keep 6 months."}
            ]
        }"#;
        let parsed: TavilyResponse = serde_json::from_str(json).unwrap();
        let text = parsed.render().unwrap();
        assert_eq!(
            text,
            "Summary: Most small businesses fail within five years.\n\
             - Startup survival (https://a.test): About 20% fail in year one.\n\
             - Savings runway (https://b.test): Keep 6 months."
        );
    }

    #[test]
    fn empty_results_are_an_error() {
        let parsed: TavilyResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(parsed.render(), Err(SearchError::NoResults));
    }
}
