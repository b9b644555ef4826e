//! Cookie-driven session layer.
//!
//! Resolves the session id from the configured cookie (minting a fresh one
//! when absent), inserts a [`Session`] handle into request extensions, and
//! sets the cookie on the response for newly minted sessions.

use super::{Session, SessionStore};
use crate::state::CasState;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request},
    response::Response,
};
use std::sync::Arc;
use tower::{Layer, Service};
use uuid::Uuid;

/// Layer binding a session to every request.
#[derive(Clone)]
pub struct SessionLayer {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
}

impl SessionLayer {
    #[must_use]
    pub fn new(state: &CasState) -> Self {
        Self {
            store: state.sessions.clone(),
            cookie_name: state.config.session_cookie.clone(),
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            store: self.store.clone(),
            cookie_name: self.cookie_name.clone(),
        }
    }
}

/// Session service wrapper.
#[derive(Clone)]
pub struct SessionService<S> {
    inner: S,
    store: Arc<dyn SessionStore>,
    cookie_name: String,
}

impl<S> Service<Request<Body>> for SessionService<S>
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

        let (session_id, is_new) = match cookie_value(req.headers(), &self.cookie_name) {
            Some(id) => (id, false),
            None => (Uuid::new_v4().to_string(), true),
        };
        req.extensions_mut()
            .insert(Session::new(session_id.clone(), self.store.clone()));

        let cookie_name = self.cookie_name.clone();
        Box::pin(async move {
            let mut response = inner.call(req).await?;
            if is_new {
                let cookie = format!("{cookie_name}={session_id}; Path=/; HttpOnly");
                if let Ok(value) = HeaderValue::from_str(&cookie) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            Ok(response)
        })
    }
}

/// Pull a cookie's value out of the `Cookie` request header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in header.split(';') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if key == name && !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
