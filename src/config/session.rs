//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session lifetime and verdict settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which an unfinished session is evicted
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Recompute the verdict from the parsed scores
    #[serde(default = "default_enforce_rubric")]
    pub enforce_rubric: bool,
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // one week keeps chrono arithmetic comfortably in range
        ValidationError::check_range("session.idle_ttl_secs", self.idle_ttl_secs as f64, 1.0, 604_800.0)?;
        ValidationError::check_range(
            "session.sweep_interval_secs",
            self.sweep_interval_secs as f64,
            1.0,
            86_400.0,
        )?;
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            enforce_rubric: default_enforce_rubric(),
        }
    }
}

fn default_idle_ttl() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_enforce_rubric() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_ttl(), Duration::from_secs(1800));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert!(config.enforce_rubric);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = SessionConfig {
            idle_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
