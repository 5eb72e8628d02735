//! Router wiring.
//!
//! [`build_app`] wraps any page router with the guard; [`shell_pages`] is
//! the placeholder page set the binary serves.

use axum::{
    Extension, Router,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use tower::ServiceBuilder;

use hemmy_auth::RouteGuard;

use crate::context::SessionContext;
use crate::middleware::{self, GuardState};

/// Guard `pages` and add the unguarded health probe.
pub fn build_app(pages: Router, guard: RouteGuard) -> Router {
    let guarded = pages.layer(axum::middleware::from_fn_with_state(
        GuardState::new(guard),
        middleware::route_guard_middleware,
    ));

    Router::new()
        .route("/health", get(health))
        .merge(guarded)
        .layer(ServiceBuilder::new())
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub fn shell_pages() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(|| page("Login")))
        .route("/lock-screen", get(|| page("Lock screen")))
        .route("/not-authorized", get(|| page("Not authorized")))
        .fallback(not_found)
}

async fn home(Extension(session): Extension<SessionContext>) -> Html<String> {
    let state = if session.is_signed_in() { "signed in" } else { "anonymous" };
    Html(format!("<h1>Grupo Hemmy</h1><p>{state}</p>"))
}

async fn page(title: &'static str) -> Html<String> {
    Html(format!("<h1>{title}</h1>"))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, page("Not found").await)
}
