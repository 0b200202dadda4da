//! Session Store Port - Interface for holding live decision sessions.
//!
//! Sessions are process-local and single-use; surviving a restart is not a
//! goal. Serializing turns for one key is the caller's job (see
//! `SessionLocks`), the store only guarantees each call is atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::decision::DecisionSession;
use crate::domain::foundation::SessionKey;

/// Errors that can occur during session store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session already exists: {0}")]
    AlreadyExists(SessionKey),

    #[error("Session not found: {0}")]
    NotFound(SessionKey),

    #[error("Session backend error: {0}")]
    Backend(String),
}

/// Port for live session state keyed by session identifier
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, `None` when the key has no live session.
    async fn get(&self, key: &SessionKey) -> Result<Option<DecisionSession>, SessionStoreError>;

    /// Insert a new session.
    ///
    /// # Errors
    /// Returns `SessionStoreError::AlreadyExists` if the key is taken
    async fn create(&self, session: DecisionSession) -> Result<(), SessionStoreError>;

    /// Replace an existing session.
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if the key has no session
    async fn update(&self, session: DecisionSession) -> Result<(), SessionStoreError>;

    /// Remove a session. Returns whether one was present.
    async fn delete(&self, key: &SessionKey) -> Result<bool, SessionStoreError>;

    /// Remove every session idle since before `cutoff`, returning their keys.
    async fn evict_idle(&self, cutoff: DateTime<Utc>)
        -> Result<Vec<SessionKey>, SessionStoreError>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize, SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_session() {
        let key = SessionKey::new("abc").unwrap();
        assert_eq!(
            SessionStoreError::NotFound(key.clone()).to_string(),
            "Session not found: abc"
        );
        assert_eq!(
            SessionStoreError::AlreadyExists(key).to_string(),
            "Session already exists: abc"
        );
    }
}
