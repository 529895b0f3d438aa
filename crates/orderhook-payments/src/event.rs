//! Webhook Event Model
//!
//! Parses the Stripe event envelope into a tagged enum so routing on the
//! event type is exhaustive instead of an implicit string match.

use serde::Deserialize;

use crate::error::{PaymentError, Result};

/// Event type tag for completed checkouts.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Parsed webhook event
#[derive(Clone, Debug)]
pub enum WebhookEvent {
    /// Checkout completed - fulfill the order
    CheckoutCompleted(CheckoutSession),

    /// Authenticated but unhandled event type - acknowledged, never written
    Other { event_type: String },
}

/// The checkout session carried by a `checkout.session.completed` event.
///
/// Amounts are in minor currency units as Stripe sends them; `images` is
/// still the serialized text from the session metadata and is decoded when
/// the order record is built.
#[derive(Clone, Debug)]
pub struct CheckoutSession {
    /// Stripe session id, the idempotency key for the order document
    pub id: String,

    /// Customer email from session metadata
    pub email: String,

    /// Serialized image list from session metadata
    pub images: String,

    /// Order total in minor currency units
    pub amount_total: i64,

    /// Shipping portion in minor currency units
    pub amount_shipping: i64,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
}

#[derive(Deserialize)]
struct RawEventData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct RawSession {
    id: String,
    metadata: Option<RawMetadata>,
    amount_total: Option<i64>,
    total_details: Option<RawTotalDetails>,
}

#[derive(Deserialize)]
struct RawMetadata {
    email: Option<String>,
    images: Option<String>,
}

#[derive(Deserialize)]
struct RawTotalDetails {
    amount_shipping: Option<i64>,
}

/// Parse a verified payload into a [`WebhookEvent`].
///
/// Must only be called on a payload that already passed signature
/// verification; nothing here authenticates the sender.
pub fn parse_event(payload: &str) -> Result<WebhookEvent> {
    let event: RawEvent = serde_json::from_str(payload)
        .map_err(|e| PaymentError::Parse(format!("invalid event envelope: {e}")))?;

    if event.event_type != CHECKOUT_COMPLETED {
        return Ok(WebhookEvent::Other {
            event_type: event.event_type,
        });
    }

    let session: RawSession = serde_json::from_value(event.data.object)
        .map_err(|e| PaymentError::Parse(format!("invalid checkout session: {e}")))?;

    let metadata = session
        .metadata
        .ok_or_else(|| PaymentError::Parse("checkout session has no metadata".into()))?;

    Ok(WebhookEvent::CheckoutCompleted(CheckoutSession {
        id: session.id,
        email: metadata
            .email
            .ok_or_else(|| PaymentError::Parse("metadata.email missing".into()))?,
        images: metadata
            .images
            .ok_or_else(|| PaymentError::Parse("metadata.images missing".into()))?,
        amount_total: session
            .amount_total
            .ok_or_else(|| PaymentError::Parse("amount_total missing".into()))?,
        amount_shipping: session
            .total_details
            .and_then(|t| t.amount_shipping)
            .ok_or_else(|| PaymentError::Parse("total_details.amount_shipping missing".into()))?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETED: &str = r#"{
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "sess_1",
                "metadata": {"email": "a@b.com", "images": "[]"},
                "amount_total": 1000,
                "total_details": {"amount_shipping": 0}
            }
        }
    }"#;

    #[test]
    fn test_parse_checkout_completed() {
        let event = parse_event(COMPLETED).unwrap();
        let WebhookEvent::CheckoutCompleted(session) = event else {
            panic!("expected checkout completed");
        };

        assert_eq!(session.id, "sess_1");
        assert_eq!(session.email, "a@b.com");
        assert_eq!(session.images, "[]");
        assert_eq!(session.amount_total, 1000);
        assert_eq!(session.amount_shipping, 0);
    }

    #[test]
    fn test_parse_other_event_type() {
        let payload = r#"{"type": "invoice.paid", "data": {"object": {}}}"#;
        let event = parse_event(payload).unwrap();

        assert!(matches!(
            event,
            WebhookEvent::Other { event_type } if event_type == "invoice.paid"
        ));
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        let payload = r#"{
            "type": "checkout.session.completed",
            "data": {"object": {"id": "sess_2", "amount_total": 100}}
        }"#;

        let err = parse_event(payload).unwrap_err();
        assert!(matches!(err, PaymentError::Parse(_)));
    }

    #[test]
    fn test_garbage_payload_rejected() {
        assert!(parse_event("{not json").is_err());
    }
}
