//! Service-ticket validation.
//!
//! Drives one request carrying a `ticket` query parameter through the
//! validation state machine and, on success, writes the authenticated
//! state into the session. Returns the redirect target for the response.

use crate::context::RequestContext;
use crate::error::{CasError, CasResult};
use crate::session::{CasAuth, Session};
use crate::state::CasState;
use casgate_proto::ServiceValidation;
use chrono::Utc;
use tracing::{debug, info, instrument};

/// Validate the ticket on an incoming login-callback request.
///
/// Returns the URL to redirect to. Re-entry with the ticket already held
/// by the session is idempotent; requests without a ticket bounce back to
/// the recorded last URL without contacting the CAS server.
#[instrument(skip_all, fields(session_id = %session.id()))]
pub async fn validate_ticket(
    state: &CasState,
    session: &Session,
    ctx: &RequestContext,
    ticket: Option<&str>,
) -> CasResult<String> {
    let last_url = session.last_url().await?;

    let Some(ticket) = ticket else {
        debug!("no ticket in query, bouncing to last url");
        return Ok(last_url);
    };

    if let Some(auth) = session.auth().await? {
        if auth.service_ticket == ticket {
            debug!("ticket already validated for this session");
            return Ok(last_url);
        }
    }

    let service = state.config.service_url();
    let mut query = vec![
        ("ticket", ticket.to_string()),
        ("service", service.clone()),
    ];
    if let Some(callback_url) = state.config.proxy_callback_url() {
        query.push(("pgtUrl", callback_url));
    }

    let url = state
        .config
        .server_url(&state.config.paths.service_validate);
    let body = state.client.service_validate(&url, &query).await?;

    let outcome = casgate_proto::parse_service_validation(&body)
        .map_err(|e| CasError::ValidationParse(e.to_string()))?;

    match outcome {
        ServiceValidation::Failure { code, message } => {
            Err(CasError::ValidationRejected { code, message })
        }
        ServiceValidation::Success { user, pgt_iou } => {
            let proxy_granting_ticket = if state.config.proxy_mode() {
                let iou = pgt_iou.ok_or(CasError::CorrelationMiss { pgt_iou: None })?;
                let pgt_id = state
                    .correlations
                    .take(&iou)
                    .await
                    .ok_or_else(|| CasError::CorrelationMiss {
                        pgt_iou: Some(iou.clone()),
                    })?;
                Some(pgt_id)
            } else {
                None
            };

            // A re-login in the same session supersedes the old ticket.
            if let Some(previous) = session.auth().await? {
                state.tickets.remove(&previous.service_ticket).await;
            }

            session
                .establish(CasAuth {
                    user: user.clone(),
                    service_ticket: ticket.to_string(),
                    proxy_granting_ticket,
                    logged_in_at: Utc::now(),
                })
                .await?;
            state.tickets.insert(ticket, session.id()).await;

            info!(user = %user, "ticket validated, session established");

            let target = state
                .config
                .redirect
                .as_ref()
                .and_then(|resolve| resolve(ctx))
                .unwrap_or(last_url);
            Ok(target)
        }
    }
}
