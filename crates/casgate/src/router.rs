//! CAS endpoint router.

use crate::handlers::{logout, proxy_callback, single_logout, validate};
use crate::session::SessionLayer;
use crate::state::CasState;
use axum::{
    routing::get,
    Router,
};

/// Router for the CAS endpoints this application exposes: the validation
/// mount (GET login callback, POST single logout), the explicit logout
/// route, and — in proxy mode — the proxy callback.
///
/// Paths come from the configuration; the session layer is applied here so
/// the router is self-contained. Merge it with gate-protected application
/// routes:
///
/// ```rust,ignore
/// let state = CasState::new(config);
/// let app = Router::new()
///     .route("/", get(index))
///     .layer(CasGateLayer::new(state.clone()))
///     .layer(SessionLayer::new(&state))
///     .merge(cas_router(state));
/// ```
pub fn cas_router(state: CasState) -> Router {
    let paths = state.config.paths.clone();
    let mut router = Router::new()
        .route(&paths.validate, get(validate).post(single_logout))
        .route("/logout", get(logout));

    if let Some(callback_path) = &paths.proxy_callback {
        router = router.route(callback_path, get(proxy_callback));
    }

    router
        .with_state(state.clone())
        .layer(SessionLayer::new(&state))
}
