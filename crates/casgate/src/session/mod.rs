//! Session state and the cookie-driven session layer.

pub mod index;
pub mod layer;
pub mod store;
pub mod types;

pub use index::TicketIndex;
pub use layer::{SessionLayer, SessionService};
pub use store::{MemorySessionStore, SessionError, SessionStore};
pub use types::{CasAuth, SessionState};

use crate::error::CasResult;
use std::fmt;
use std::sync::Arc;

/// Handle to one user session, bound to a request by the session layer.
///
/// Reads and writes go straight through to the backing [`SessionStore`],
/// so mutations made while a request is in flight are visible to
/// concurrent requests for the same session.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

impl Session {
    #[must_use]
    pub fn new(id: String, store: Arc<dyn SessionStore>) -> Self {
        Self { id, store }
    }

    /// The stable session identifier carried by the cookie.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current session state; absent sessions read as the default state.
    pub async fn state(&self) -> CasResult<SessionState> {
        Ok(self.store.load(&self.id).await?.unwrap_or_default())
    }

    /// The authenticated CAS state, when the session holds one.
    pub async fn auth(&self) -> CasResult<Option<CasAuth>> {
        Ok(self.state().await?.auth)
    }

    /// The recorded pre-login URL, defaulting to `/`.
    pub async fn last_url(&self) -> CasResult<String> {
        Ok(self
            .state()
            .await?
            .last_url
            .unwrap_or_else(|| "/".to_string()))
    }

    /// Record the URL to return to after login.
    pub async fn remember_last_url(&self, url: String) -> CasResult<()> {
        let mut state = self.state().await?;
        state.last_url = Some(url);
        self.store.save(&self.id, state).await?;
        Ok(())
    }

    /// Write a fully populated authenticated state in one step; the
    /// session is never observable with a partial one.
    pub async fn establish(&self, auth: CasAuth) -> CasResult<()> {
        let mut state = self.state().await?;
        state.auth = Some(auth);
        self.store.save(&self.id, state).await?;
        Ok(())
    }

    /// Destroy this session entirely.
    pub async fn destroy(&self) -> CasResult<()> {
        self.store.destroy(&self.id).await?;
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
