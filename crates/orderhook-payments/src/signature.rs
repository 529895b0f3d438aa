//! Stripe Webhook Signature Verification
//!
//! Stripe signs each delivery with the endpoint's shared secret and sends
//! the result in the `stripe-signature` header as `t=<unix-ts>,v1=<hex>`.
//! The `v1` digest is HMAC-SHA256 over `"{t}.{payload}"`, computed on the
//! raw payload bytes exactly as transmitted.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Replay tolerance for the signed timestamp, in seconds.
///
/// Matches Stripe's documented default of five minutes.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verify a Stripe webhook signature against the raw payload bytes.
///
/// The secret never appears in the returned error, only the reason the
/// check failed.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &str) -> Result<()> {
    verify_at(payload, signature_header, secret, Utc::now().timestamp())
}

/// Verification with an explicit "now", so the tolerance window is testable.
fn verify_at(payload: &[u8], signature_header: &str, secret: &str, now: i64) -> Result<()> {
    let mut timestamp: Option<&str> = None;
    let mut expected_sig: Option<&str> = None;

    // Header format: t=<timestamp>,v1=<hex>[,v0=<hex>]
    for part in signature_header.split(',') {
        let mut split = part.splitn(2, '=');
        match (split.next(), split.next()) {
            (Some("t"), Some(value)) => timestamp = Some(value),
            (Some("v1"), Some(value)) => expected_sig = Some(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| PaymentError::Signature("missing timestamp in signature header".into()))?;
    let expected_sig = expected_sig
        .ok_or_else(|| PaymentError::Signature("missing v1 signature in header".into()))?;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| PaymentError::Signature("malformed timestamp in signature header".into()))?;
    if (now - ts).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(PaymentError::Signature(
            "timestamp outside tolerance window".into(),
        ));
    }

    let expected = hex::decode(expected_sig)
        .map_err(|_| PaymentError::Signature("signature is not valid hex".into()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::Signature("invalid webhook secret".into()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    // Constant-time comparison
    mac.verify_slice(&expected)
        .map_err(|_| PaymentError::Signature("signature mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        let digest = hex::encode(mac.finalize().into_bytes());
        format!("t={timestamp},v1={digest}")
    }

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = Utc::now().timestamp();
        let header = sign(payload, SECRET, now);

        assert!(verify_at(payload, &header, SECRET, now).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = Utc::now().timestamp();
        let header = sign(payload, "whsec_other", now);

        let err = verify_at(payload, &header, SECRET, now).unwrap_err();
        assert!(matches!(err, PaymentError::Signature(_)));
    }

    #[test]
    fn test_altered_payload_rejected() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = Utc::now().timestamp();
        let header = sign(payload, SECRET, now);

        let mut tampered = payload.to_vec();
        tampered[0] = b' ';
        assert!(verify_at(&tampered, &header, SECRET, now).is_err());
    }

    #[test]
    fn test_expired_timestamp_rejected() {
        let payload = b"payload";
        let now = Utc::now().timestamp();
        // Signed 10 minutes ago, beyond the 5 minute tolerance
        let header = sign(payload, SECRET, now - 600);

        let err = verify_at(payload, &header, SECRET, now).unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let payload = b"payload";
        let now = Utc::now().timestamp();

        assert!(verify_at(payload, "", SECRET, now).is_err());
        assert!(verify_at(payload, "t=abc,v1=00", SECRET, now).is_err());
        assert!(verify_at(payload, &format!("t={now}"), SECRET, now).is_err());
        assert!(verify_at(payload, &format!("t={now},v1=nothex"), SECRET, now).is_err());
    }
}
