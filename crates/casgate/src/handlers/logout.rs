//! Explicit logout: destroy the local session and send the browser to the
//! CAS logout page so the server-side single sign-on session ends too.

use super::found;
use crate::error::CasError;
use crate::session::Session;
use crate::state::CasState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension,
};
use tracing::{info, warn};

/// Destroy the session and redirect to the CAS logout page.
pub async fn logout(State(state): State<CasState>, session: Option<Extension<Session>>) -> Response {
    let Some(Extension(session)) = session else {
        return CasError::Session("session layer not mounted".to_string()).into_response();
    };

    match session.auth().await {
        Ok(Some(auth)) => {
            state.tickets.remove(&auth.service_ticket).await;
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not read session during logout"),
    }
    if let Err(e) = session.destroy().await {
        warn!(error = %e, "could not destroy session during logout");
    }
    state.pt_cache.clear_session(session.id()).await;
    info!(session_id = %session.id(), "session logged out");

    let location = format!(
        "{}{}?service={}",
        state.config.server_path,
        state.config.paths.logout,
        urlencoding::encode(&state.config.service_prefix)
    );
    found(&location)
}
