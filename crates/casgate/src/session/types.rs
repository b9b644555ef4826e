//! Session state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated CAS state held by a session.
///
/// Written only as a whole: a session either carries the complete state or
/// none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasAuth {
    /// The CAS principal.
    pub user: String,
    /// The service ticket this login was established with.
    pub service_ticket: String,
    /// The proxy-granting ticket, present in proxy mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_granting_ticket: Option<String>,
    /// When validation succeeded.
    pub logged_in_at: DateTime<Utc>,
}

/// Everything this client keeps in a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Authenticated CAS state, absent until validation succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<CasAuth>,
    /// The URL the user was visiting before being sent to login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_url: Option<String>,
}
