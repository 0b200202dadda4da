//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `DECISION_DESK` prefix
//! and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use decision_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod error;
mod logging;
mod search;
mod session;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use search::SearchConfig;
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only `ai.api_key` must be supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Language model configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Context search configuration (Tavily)
    #[serde(default)]
    pub search: SearchConfig,

    /// Session lifetime and verdict enforcement
    #[serde(default)]
    pub session: SessionConfig,

    /// Log filter
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DECISION_DESK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_DESK__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `DECISION_DESK__SESSION__IDLE_TTL_SECS=600` -> `session.idle_ttl_secs = 600`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DECISION_DESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.search.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
