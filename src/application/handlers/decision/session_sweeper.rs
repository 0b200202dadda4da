//! SessionSweeper - evicts sessions abandoned mid-conversation.
//!
//! Runs on a fixed interval until the shutdown channel flips to `true`.
//! A failed sweep is logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::SessionKey;
use crate::ports::{SessionStore, SessionStoreError};

use super::SessionLocks;

/// Configuration for the SessionSweeper.
#[derive(Debug, Clone)]
pub struct SessionSweeperConfig {
    /// Sessions idle longer than this are evicted.
    pub idle_ttl: Duration,
    /// How often to sweep.
    pub sweep_interval: Duration,
}

impl Default for SessionSweeperConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl SessionSweeperConfig {
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Background task evicting idle sessions.
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    locks: Option<Arc<SessionLocks>>,
    config: SessionSweeperConfig,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionSweeperConfig) -> Self {
        Self {
            store,
            locks: None,
            config,
        }
    }

    /// Also prunes unused lock slots after each sweep.
    pub fn with_locks(mut self, locks: Arc<SessionLocks>) -> Self {
        self.locks = Some(locks);
        self
    }

    /// Sweeps until `shutdown` becomes `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Session sweeper stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        tracing::warn!(error = %err, "Session sweep failed");
                    }
                }
            }
        }
    }

    /// Evicts every session idle longer than the TTL, returning their keys.
    pub async fn sweep_once(&self) -> Result<Vec<SessionKey>, SessionStoreError> {
        // a TTL too large to subtract from now never expires anything
        let Some(cutoff) = chrono::Duration::from_std(self.config.idle_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return Ok(Vec::new());
        };

        let evicted = self.store.evict_idle(cutoff).await?;
        for key in &evicted {
            tracing::info!(session = %key, "Evicted idle decision session");
        }
        if let Some(locks) = &self.locks {
            locks.prune();
        }
        Ok(evicted)
    }
}
