//! HTTP Handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use orderhook_payments::WebhookHandler;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Stripe webhook endpoint
///
/// The body arrives as raw bytes because the signature covers the payload
/// exactly as Stripe sent it; any parsing happens only after verification.
/// Stripe treats any non-2xx response as a request to redeliver, so every
/// failure path answers 400 with a reason and a success answers 200.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = match single_signature_header(&headers) {
        Ok(value) => value,
        Err(reason) => {
            tracing::warn!(reason, "Webhook rejected before verification");
            return (StatusCode::BAD_REQUEST, format!("Webhook error: {reason}")).into_response();
        }
    };

    let handler = WebhookHandler::new(state.store.clone());

    let event = match handler.verify_and_parse(&body, signature, &state.webhook_secret) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook rejected");
            let body = if e.is_signature_failure() {
                format!("Webhook error: {e}")
            } else {
                format!("webhook Error: {e}")
            };
            return (StatusCode::BAD_REQUEST, body).into_response();
        }
    };

    match handler.handle(event).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Fulfillment failed");
            (StatusCode::BAD_REQUEST, format!("webhook Error: {e}")).into_response()
        }
    }
}

/// Extract the `stripe-signature` header, requiring exactly one value.
///
/// A duplicated header is ambiguous and rejected rather than silently
/// picking one of the values.
fn single_signature_header(headers: &HeaderMap) -> Result<&str, &'static str> {
    let mut values = headers.get_all("stripe-signature").iter();

    match (values.next(), values.next()) {
        (Some(value), None) => value.to_str().map_err(|_| "signature header is not ASCII"),
        (Some(_), Some(_)) => Err("multiple stripe-signature headers"),
        (None, _) => Err("missing stripe-signature header"),
    }
}
