//! # orderhook-server
//!
//! Axum server exposing the Stripe fulfillment webhook and a health check.

pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{health_check, stripe_webhook};
use crate::state::AppState;

/// Cap on the webhook body; Stripe events are a few KiB.
const BODY_LIMIT: usize = 256 * 1024;

/// Bound on a whole request, covering body read and the database write.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the application router.
///
/// Non-POST methods on the webhook path get an explicit 405 from the
/// method router; unknown paths get 404.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook/stripe", post(stripe_webhook))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
