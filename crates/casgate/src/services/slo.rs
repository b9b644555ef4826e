//! Single logout teardown.
//!
//! The CAS server posts a logout notification to the validation path. The
//! embedded session index is the service ticket issued at login; the
//! ticket index maps it back to the session to destroy. Notifications are
//! fire-and-forget: malformed bodies are acknowledged with 202 and
//! otherwise ignored, and notifications for unknown tickets are harmless
//! no-ops.

use crate::state::CasState;
use axum::http::StatusCode;
use tracing::{debug, error, info, instrument, warn};

/// Handle a posted logout notification, returning the response status.
#[instrument(skip_all)]
pub async fn handle_logout_notification(state: &CasState, body: &str) -> StatusCode {
    let notification = match casgate_proto::parse_logout_request(body) {
        Ok(notification) => notification,
        Err(e) => {
            warn!(error = %e, "unparseable logout notification, ignoring");
            return StatusCode::ACCEPTED;
        }
    };

    let ticket = notification.session_index;
    match state.tickets.take(&ticket).await {
        Some(session_id) => {
            if let Err(e) = state.sessions.destroy(&session_id).await {
                error!(session_id = %session_id, error = %e, "failed to destroy session");
            } else {
                info!(session_id = %session_id, "session destroyed by single logout");
            }
        }
        None => {
            debug!("logout notification for unknown or expired ticket");
        }
    }

    StatusCode::OK
}
