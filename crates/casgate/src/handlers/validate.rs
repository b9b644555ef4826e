//! The validation mount: GET validates service tickets, POST receives
//! single-logout notifications from the CAS server.

use super::found;
use crate::context::RequestContext;
use crate::error::CasError;
use crate::services::{slo, validator};
use crate::session::Session;
use crate::state::CasState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub ticket: Option<String>,
}

/// Validate the service ticket carried by the login callback and redirect.
pub async fn validate(
    State(state): State<CasState>,
    session: Option<Extension<Session>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<ValidateQuery>,
) -> Response {
    let Some(Extension(session)) = session else {
        return CasError::Session("session layer not mounted".to_string()).into_response();
    };

    let ctx = RequestContext::new(method, uri, headers);
    match validator::validate_ticket(&state, &session, &ctx, query.ticket.as_deref()).await {
        Ok(target) => found(&target),
        Err(err) => err.into_response(),
    }
}

/// Receive an asynchronous logout notification posted by the CAS server.
pub async fn single_logout(State(state): State<CasState>, body: String) -> StatusCode {
    slo::handle_logout_notification(&state, &body).await
}
