//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}

impl ValidationError {
    pub(crate) fn check_range(
        field: &'static str,
        actual: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ValidationError> {
        if (min..=max).contains(&actual) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            })
        }
    }

    pub(crate) fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.starts_with("https://") || value.starts_with("http://") {
            Ok(())
        } else {
            Err(ValidationError::InvalidUrl {
                field,
                value: value.to_string(),
            })
        }
    }
}
