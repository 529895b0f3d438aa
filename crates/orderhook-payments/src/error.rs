//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Webhook processing errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    Signature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    Parse(String),

    /// Session metadata could not be decoded
    #[error("Metadata decode error: {0}")]
    Metadata(String),

    /// Order store write or read failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// True when the failure precedes authentication of the payload.
    ///
    /// The HTTP layer uses this to pick between the two error body shapes
    /// Stripe sees (`Webhook error: ...` vs `webhook Error: ...`).
    pub fn is_signature_failure(&self) -> bool {
        matches!(self, PaymentError::Signature(_))
    }
}
