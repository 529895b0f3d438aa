//! # orderhook-payments
//!
//! Stripe webhook verification and order fulfillment for orderhook.
//!
//! ## Flow
//!
//! Stripe delivers each payment event as a `POST` carrying the raw event
//! JSON and a `stripe-signature` header:
//!
//! ```text
//! ┌─────────┐  signed payload   ┌──────────────┐  OrderRecord  ┌────────────┐
//! │ Stripe  │──────────────────▶│ WebhookHandler│──────────────▶│ OrderStore │
//! │ webhook │                   │ verify+parse  │   (upsert)    │ (document  │
//! └─────────┘                   └──────────────┘               │  database) │
//!                                                              └────────────┘
//! ```
//!
//! Verification recomputes the HMAC-SHA256 signature over the exact bytes
//! Stripe sent, so the payload must reach [`verify_signature`] untouched by
//! any body parser.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderhook_payments::{MemoryOrderStore, WebhookHandler};
//! use std::sync::Arc;
//!
//! let handler = WebhookHandler::new(Arc::new(MemoryOrderStore::new()));
//! let event = handler.verify_and_parse(payload, signature_header, secret)?;
//! handler.handle(event).await?;
//! ```

mod error;
mod event;
mod order;
mod signature;
mod webhook;

pub use error::{PaymentError, Result};
pub use event::{CheckoutSession, WebhookEvent, parse_event};
pub use order::{MemoryOrderStore, OrderRecord, OrderStore, StoredOrder};
pub use signature::verify_signature;
pub use webhook::WebhookHandler;
