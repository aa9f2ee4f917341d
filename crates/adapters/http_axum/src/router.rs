//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::MockState;

/// Build the mock controller [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ping", get(ping))
        .route("/device", get(crate::device::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn ping() -> &'static str {
    "pong"
}
