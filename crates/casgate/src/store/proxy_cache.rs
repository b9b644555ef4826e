//! Per-session proxy-ticket cache.
//!
//! Proxy tickets are short-lived and interchangeable within their TTL, so
//! entries are keyed by `(session id, target service)` and the last writer
//! wins under concurrent population. Expiry is checked lazily at read
//! time.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedTicket {
    ticket: String,
    stored_at: Instant,
}

impl CachedTicket {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Proxy-ticket cache scoped per session.
#[derive(Debug)]
pub struct ProxyTicketCache {
    entries: RwLock<HashMap<(String, String), CachedTicket>>,
    ttl: Duration,
}

impl ProxyTicketCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// A cached ticket for this session and target, unless expired.
    pub async fn get(&self, session_id: &str, target_service: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(session_id.to_string(), target_service.to_string()))?;
        if entry.is_expired(self.ttl) {
            return None;
        }
        Some(entry.ticket.clone())
    }

    /// Cache a freshly issued ticket, replacing any previous one.
    pub async fn put(&self, session_id: &str, target_service: &str, ticket: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(
            (session_id.to_string(), target_service.to_string()),
            CachedTicket {
                ticket: ticket.to_string(),
                stored_at: Instant::now(),
            },
        );
        debug!(target_service = %target_service, "proxy ticket cached");
    }

    /// Drop one entry.
    pub async fn remove(&self, session_id: &str, target_service: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(&(session_id.to_string(), target_service.to_string()));
    }

    /// Drop every entry belonging to a session.
    pub async fn clear_session(&self, session_id: &str) {
        let mut entries = self.entries.write().await;
        entries.retain(|(sid, _), _| sid != session_id);
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}
