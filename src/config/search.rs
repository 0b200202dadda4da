//! Context search configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Tavily search configuration. Without a key, search is reported unavailable.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the API key when one is set
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_url("search.base_url", &self.base_url)?;
        ValidationError::check_range("search.max_results", f64::from(self.max_results), 1.0, 20.0)?;
        ValidationError::check_range("search.timeout_secs", self.timeout_secs as f64, 1.0, 120.0)?;
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_max_results() -> u32 {
    4
}

fn default_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_results, 4);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = SearchConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_max_results_range() {
        let config = SearchConfig {
            max_results: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
