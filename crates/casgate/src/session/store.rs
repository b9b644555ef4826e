//! Session storage.
//!
//! Sessions live behind a trait so deployments can swap the in-memory
//! store for a shared one; the client itself only needs load/save/destroy
//! keyed by the cookie-derived session id.

use super::types::SessionState;
use crate::error::CasError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Session storage error.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),
}

impl From<SessionError> for CasError {
    fn from(err: SessionError) -> Self {
        CasError::Session(err.to_string())
    }
}

/// Session store keyed by a stable session identifier.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session's state, if the session exists.
    async fn load(&self, id: &str) -> Result<Option<SessionState>, SessionError>;

    /// Create or replace a session's state.
    async fn save(&self, id: &str, state: SessionState) -> Result<(), SessionError>;

    /// Remove a session entirely.
    async fn destroy(&self, id: &str) -> Result<(), SessionError>;
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionState>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionState>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn save(&self, id: &str, state: SessionState) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.to_string(), state);
        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(id).is_some() {
            tracing::debug!(session_id = %id, "session destroyed");
        }
        Ok(())
    }
}
