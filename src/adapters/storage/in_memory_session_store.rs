//! In-Memory Session Store Adapter
//!
//! Holds live decision sessions in a process-local map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::decision::DecisionSession;
use crate::domain::foundation::SessionKey;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for decision sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, DecisionSession>>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<DecisionSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn create(&self, session: DecisionSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.key()) {
            return Err(SessionStoreError::AlreadyExists(session.key().clone()));
        }
        sessions.insert(session.key().clone(), session);
        Ok(())
    }

    async fn update(&self, session: DecisionSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session.key()) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(SessionStoreError::NotFound(session.key().clone())),
        }
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(key).is_some())
    }

    async fn evict_idle(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<SessionKey>, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<SessionKey> = sessions
            .values()
            .filter(|s| s.is_idle_since(cutoff))
            .map(|s| s.key().clone())
            .collect();
        for key in &idle {
            sessions.remove(key);
        }
        Ok(idle)
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.read().await.len())
    }
}
