//! Proxy-granting-ticket correlation store.
//!
//! During ticket validation the CAS server delivers the real PGT id
//! out-of-band to the proxy callback, keyed by the IOU it returns in the
//! validation response. The callback request carries no user session, so
//! entries live in this process-wide map until the validator claims them.
//! Unclaimed entries expire after a short TTL, checked lazily at read
//! time.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CorrelationEntry {
    pgt_id: String,
    stored_at: Instant,
}

impl CorrelationEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Short-lived map from PGT IOU to the delivered PGT id.
#[derive(Debug)]
pub struct CorrelationStore {
    entries: RwLock<HashMap<String, CorrelationEntry>>,
    ttl: Duration,
}

impl CorrelationStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Record a delivered PGT. A second delivery for the same IOU
    /// overwrites the first.
    pub async fn put(&self, pgt_iou: &str, pgt_id: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(
            pgt_iou.to_string(),
            CorrelationEntry {
                pgt_id: pgt_id.to_string(),
                stored_at: Instant::now(),
            },
        );
        debug!(pgt_iou = %pgt_iou, "proxy-granting ticket correlated");
    }

    /// Claim the PGT for an IOU, consuming the entry. Expired entries
    /// read as absent.
    pub async fn take(&self, pgt_iou: &str) -> Option<String> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(pgt_iou)?;
        if entry.is_expired(self.ttl) {
            debug!(pgt_iou = %pgt_iou, "correlation entry expired before claim");
            return None;
        }
        Some(entry.pgt_id)
    }

    /// Drop an entry without claiming it.
    pub async fn remove(&self, pgt_iou: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(pgt_iou);
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}
