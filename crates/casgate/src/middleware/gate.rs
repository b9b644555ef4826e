//! The authentication gate.
//!
//! Wraps application routes and decides per request: pass through,
//! redirect to the CAS login page, or answer AJAX requests with a
//! configured status. Pass-through requests get a [`CasContext`] inserted
//! into extensions so handlers can obtain proxy tickets.
//!
//! [`SessionLayer`](crate::session::SessionLayer) must be mounted outside
//! this layer; the gate reads the [`Session`] it inserts.

use crate::config::Hook;
use crate::context::{CasContext, RequestContext};
use crate::error::CasError;
use crate::handlers::found;
use crate::session::Session;
use crate::state::CasState;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, error};

/// Layer applying the authentication gate to a service.
#[derive(Clone)]
pub struct CasGateLayer {
    state: CasState,
}

impl CasGateLayer {
    #[must_use]
    pub fn new(state: CasState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for CasGateLayer {
    type Service = CasGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CasGateService {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Authentication gate service wrapper.
#[derive(Clone)]
pub struct CasGateService<S> {
    inner: S,
    state: CasState,
}

impl<S> Service<Request<Body>> for CasGateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let inner = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, inner);
        let state = self.state.clone();

        Box::pin(async move {
            let Some(session) = req.extensions().get::<Session>().cloned() else {
                error!("no session on request; mount SessionLayer outside CasGateLayer");
                return Ok(
                    CasError::Session("session layer not mounted".to_string()).into_response()
                );
            };

            let ctx = Arc::new(RequestContext::from_request(&req));
            run_hook(&state.config.hooks.before, &ctx).await;

            // Restlet-triggered requests run under a service identity and
            // need no browser login.
            if state.config.matched_restlet(&ctx).is_some() {
                debug!(path = %ctx.path(), "restlet integration matched, passing through");
                req.extensions_mut().insert(CasContext::new(
                    state.clone(),
                    session.clone(),
                    ctx.clone(),
                ));
                run_hook(&state.config.hooks.after, &ctx).await;
                return inner.call(req).await;
            }

            let auth = match session.auth().await {
                Ok(auth) => auth,
                Err(e) => return Ok(e.into_response()),
            };

            let proxy_mode = state.config.proxy_mode();
            match &auth {
                Some(auth) if !proxy_mode || auth.proxy_granting_ticket.is_some() => {
                    req.extensions_mut().insert(CasContext::new(
                        state.clone(),
                        session.clone(),
                        ctx.clone(),
                    ));
                    run_hook(&state.config.hooks.after, &ctx).await;
                    return inner.call(req).await;
                }
                Some(_) => {
                    error!("proxy mode is on but the session holds no proxy-granting ticket");
                }
                None => {
                    debug!("no authenticated state in session");
                }
            }

            if let Err(e) = session
                .remember_last_url(ctx.origin_url(&state.config))
                .await
            {
                return Ok(e.into_response());
            }

            if let Some(ajax) = &state.config.from_ajax {
                if ctx.header(&ajax.header).is_some() {
                    debug!(status = %ajax.status, "AJAX request, answering without redirect");
                    run_hook(&state.config.hooks.after, &ctx).await;
                    let body = Json(serde_json::json!({
                        "message": "Login status expired, need refresh path",
                    }));
                    return Ok((ajax.status, body).into_response());
                }
            }

            let login_url = state.config.login_url(&ctx);
            debug!(login_url = %login_url, "redirecting to CAS login");
            run_hook(&state.config.hooks.after, &ctx).await;
            Ok(found(&login_url))
        })
    }
}

async fn run_hook(hook: &Option<Hook>, ctx: &Arc<RequestContext>) {
    if let Some(hook) = hook {
        hook(ctx.clone()).await;
    }
}
