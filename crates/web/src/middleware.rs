use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use hemmy_auth::{Decision, RouteGuard, SessionFlags};

use crate::context::SessionContext;

#[derive(Debug, Clone, Default)]
pub struct GuardState {
    pub guard: Arc<RouteGuard>,
}

impl GuardState {
    pub fn new(guard: RouteGuard) -> Self {
        Self { guard: Arc::new(guard) }
    }
}

/// Run every page navigation through the route guard.
///
/// Only the two session cookies are read; the request is either passed on
/// with a [`SessionContext`] or answered with a temporary redirect.
pub async fn route_guard_middleware(
    State(state): State<GuardState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let flags = session_flags(req.headers());

    match state.guard.evaluate(flags, req.uri().path()) {
        Decision::Allow => {
            req.extensions_mut().insert(SessionContext::new(flags));
            next.run(req).await
        }
        Decision::Redirect(to) => Redirect::temporary(to.path()).into_response(),
    }
}

/// Browsers may split cookies over several `Cookie` headers.
fn session_flags(headers: &HeaderMap) -> SessionFlags {
    let joined = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    SessionFlags::from_cookie_header(&joined)
}
