//! Service-ticket-to-session index.
//!
//! Single logout notifications carry only the service ticket issued at
//! login; this secondary index maps that ticket back to the session
//! holding it without scanning the session store. Entries are inserted
//! when a ticket is written into a session and removed when the session is
//! destroyed or the ticket superseded.

use std::collections::HashMap;
use tokio::sync::RwLock;

/// Maps issued service tickets to session ids.
#[derive(Debug, Default)]
pub struct TicketIndex {
    entries: RwLock<HashMap<String, String>>,
}

impl TicketIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ticket` as belonging to `session_id`.
    pub async fn insert(&self, ticket: &str, session_id: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(ticket.to_string(), session_id.to_string());
    }

    /// Look up the session holding `ticket` and remove the entry.
    pub async fn take(&self, ticket: &str) -> Option<String> {
        let mut entries = self.entries.write().await;
        entries.remove(ticket)
    }

    /// The session holding `ticket`, if any.
    pub async fn session_for(&self, ticket: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries.get(ticket).cloned()
    }

    /// Drop the entry for `ticket`.
    pub async fn remove(&self, ticket: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_take() {
        let index = TicketIndex::new();
        index.insert("ST-1", "sid-1").await;

        assert_eq!(index.session_for("ST-1").await, Some("sid-1".to_string()));
        assert_eq!(index.take("ST-1").await, Some("sid-1".to_string()));
        assert_eq!(index.take("ST-1").await, None);
    }

    #[tokio::test]
    async fn test_superseding_ticket_replaces_session() {
        let index = TicketIndex::new();
        index.insert("ST-1", "sid-1").await;
        index.insert("ST-1", "sid-2").await;
        assert_eq!(index.session_for("ST-1").await, Some("sid-2".to_string()));
    }

    #[tokio::test]
    async fn test_remove_unknown_ticket_is_noop() {
        let index = TicketIndex::new();
        index.remove("ST-missing").await;
        assert_eq!(index.session_for("ST-missing").await, None);
    }
}
