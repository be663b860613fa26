//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/encrypt", post(handlers::encrypt))
        .route("/decrypt", post(handlers::decrypt))
        .route("/hash", post(handlers::hash))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
