//! Stripe Webhook Handling
//!
//! Ties signature verification, event parsing, and order fulfillment into
//! the single request-scoped workflow the endpoint runs.

use std::sync::Arc;

use crate::error::Result;
use crate::event::{WebhookEvent, parse_event};
use crate::order::{OrderRecord, OrderStore};
use crate::signature::verify_signature;

/// Webhook handler
pub struct WebhookHandler<S: OrderStore + ?Sized> {
    store: Arc<S>,
}

impl<S: OrderStore + ?Sized> WebhookHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Verify the signature over the raw payload bytes, then parse the event.
    ///
    /// No event value ever exists for a payload that failed verification.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
        secret: &str,
    ) -> Result<WebhookEvent> {
        verify_signature(payload, signature_header, secret)?;

        let text = std::str::from_utf8(payload)
            .map_err(|e| crate::error::PaymentError::Parse(format!("payload not UTF-8: {e}")))?;
        parse_event(text)
    }

    /// Process a verified webhook event.
    ///
    /// A completed checkout produces exactly one store write; every other
    /// event type is acknowledged without touching the store.
    pub async fn handle(&self, event: WebhookEvent) -> Result<()> {
        match event {
            WebhookEvent::CheckoutCompleted(session) => {
                let record = OrderRecord::from_session(&session)?;
                self.store
                    .put_order(&session.email, &session.id, &record)
                    .await?;

                tracing::info!(
                    session_id = %session.id,
                    email = %session.email,
                    amount = record.amount,
                    "Order fulfilled"
                );
                Ok(())
            }

            WebhookEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
                Ok(())
            }
        }
    }
}
