//! Order Records & Storage
//!
//! The order record derived from a completed checkout session, and the
//! store trait it is persisted through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PaymentError, Result};
use crate::event::CheckoutSession;

/// A fulfilled order, ready to persist
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order total in decimal currency units
    pub amount: f64,

    /// Shipping portion in decimal currency units
    pub amount_shipping: f64,

    /// Product image references, decoded from session metadata
    pub images: Vec<String>,
}

impl OrderRecord {
    /// Derive an order record from a checkout session.
    ///
    /// Amounts convert from minor units (cents) to decimal currency units.
    /// `metadata.images` must decode as a JSON string list; a decode failure
    /// aborts fulfillment before anything is written.
    pub fn from_session(session: &CheckoutSession) -> Result<Self> {
        let images: Vec<String> = serde_json::from_str(&session.images)
            .map_err(|e| PaymentError::Metadata(format!("metadata.images is not a list: {e}")))?;

        Ok(Self {
            amount: session.amount_total as f64 / 100.0,
            amount_shipping: session.amount_shipping as f64 / 100.0,
            images,
        })
    }
}

/// An order as read back from the store
#[derive(Clone, Debug, PartialEq)]
pub struct StoredOrder {
    /// The persisted record
    pub order: OrderRecord,

    /// Write time, assigned by the store, never by the client
    pub timestamp: DateTime<Utc>,
}

/// Order storage trait
///
/// Orders are keyed by checkout session id scoped to the customer email.
/// `put_order` is a full-record upsert: redelivering the same event rewrites
/// the same document, so the write is safe to reapply.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Save or replace the order for this customer and session
    async fn put_order(&self, email: &str, session_id: &str, record: &OrderRecord) -> Result<()>;

    /// Fetch an order by customer and session id
    async fn get_order(&self, email: &str, session_id: &str) -> Result<Option<StoredOrder>>;
}

/// In-memory order store (for development and tests)
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<(String, String), StoredOrder>>,
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn put_order(&self, email: &str, session_id: &str, record: &OrderRecord) -> Result<()> {
        let mut orders = self.orders.write().unwrap();

        orders.insert(
            (email.to_string(), session_id.to_string()),
            StoredOrder {
                order: record.clone(),
                timestamp: Utc::now(),
            },
        );

        Ok(())
    }

    async fn get_order(&self, email: &str, session_id: &str) -> Result<Option<StoredOrder>> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .get(&(email.to_string(), session_id.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(amount_total: i64, amount_shipping: i64, images: &str) -> CheckoutSession {
        CheckoutSession {
            id: "sess_1".into(),
            email: "a@b.com".into(),
            images: images.into(),
            amount_total,
            amount_shipping,
        }
    }

    #[test]
    fn test_currency_conversion() {
        let record = OrderRecord::from_session(&session(2550, 500, "[]")).unwrap();
        assert!((record.amount - 25.50).abs() < f64::EPSILON);
        assert!((record.amount_shipping - 5.00).abs() < f64::EPSILON);
    }

    #[test]
    fn test_images_decoded() {
        let record =
            OrderRecord::from_session(&session(1000, 0, r#"["a.png","b.png"]"#)).unwrap();
        assert_eq!(record.images, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_malformed_images_rejected() {
        let err = OrderRecord::from_session(&session(1000, 0, "{not json")).unwrap_err();
        assert!(matches!(err, PaymentError::Metadata(_)));
    }

    #[tokio::test]
    async fn test_put_order_is_idempotent() {
        let store = MemoryOrderStore::new();
        let record = OrderRecord {
            amount: 10.0,
            amount_shipping: 0.0,
            images: vec![],
        };

        store.put_order("a@b.com", "sess_1", &record).await.unwrap();
        store.put_order("a@b.com", "sess_1", &record).await.unwrap();

        assert_eq!(store.len(), 1);
        let stored = store.get_order("a@b.com", "sess_1").await.unwrap().unwrap();
        assert_eq!(stored.order, record);
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let store = MemoryOrderStore::new();
        assert!(store.get_order("a@b.com", "nope").await.unwrap().is_none());
    }
}
