//! Application State

use std::sync::Arc;

use orderhook_payments::OrderStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order store, constructed once at startup and shared by all requests
    pub store: Arc<dyn OrderStore>,

    /// Stripe endpoint secret used for signature verification; never logged
    pub webhook_secret: String,
}
