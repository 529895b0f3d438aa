//! MongoDB Order Store
//!
//! One `orders` collection; `_id` is the Stripe session id and
//! `user_email` scopes documents to the customer. Writes are upserts with
//! a `$currentDate` timestamp so the write time comes from the server
//! clock, and redelivery of the same event rewrites the same document.

use async_trait::async_trait;
use bson::doc;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use orderhook_payments::{OrderRecord, OrderStore, PaymentError, Result, StoredOrder};

/// Upper bound on any single database operation.
const OP_TIMEOUT: Duration = Duration::from_secs(10);

/// The persisted document shape
#[derive(Debug, Serialize, Deserialize)]
struct OrderDoc {
    #[serde(rename = "_id")]
    session_id: String,
    user_email: String,
    amount: f64,
    amount_shipping: f64,
    images: Vec<String>,
    timestamp: bson::DateTime,
}

/// MongoDB-backed order store
#[derive(Clone)]
pub struct MongoOrderStore {
    orders: Collection<OrderDoc>,
}

impl MongoOrderStore {
    /// Connect and authenticate, verifying the deployment with a ping.
    ///
    /// Call once at startup; the returned store shares one pooled client
    /// across all requests.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| PaymentError::Config(format!("invalid MongoDB connection: {e}")))?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PaymentError::Storage(format!("MongoDB unreachable: {e}")))?;

        tracing::info!(database = %database, "Connected to MongoDB");

        Ok(Self {
            orders: db.collection("orders"),
        })
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    async fn put_order(&self, email: &str, session_id: &str, record: &OrderRecord) -> Result<()> {
        let update = doc! {
            "$set": {
                "user_email": email,
                "amount": record.amount,
                "amount_shipping": record.amount_shipping,
                "images": record.images.clone(),
            },
            "$currentDate": { "timestamp": true },
        };

        let result = timeout(
            OP_TIMEOUT,
            self.orders
                .update_one(doc! { "_id": session_id }, update)
                .upsert(true),
        )
        .await
        .map_err(|_| PaymentError::Storage("order write timed out".into()))?
        .map_err(|e| PaymentError::Storage(format!("order write failed: {e}")))?;

        tracing::debug!(
            session_id = %session_id,
            upserted = result.upserted_id.is_some(),
            "Order document written"
        );

        Ok(())
    }

    async fn get_order(&self, email: &str, session_id: &str) -> Result<Option<StoredOrder>> {
        let found = timeout(
            OP_TIMEOUT,
            self.orders
                .find_one(doc! { "_id": session_id, "user_email": email }),
        )
        .await
        .map_err(|_| PaymentError::Storage("order read timed out".into()))?
        .map_err(|e| PaymentError::Storage(format!("order read failed: {e}")))?;

        Ok(found.map(|d| StoredOrder {
            order: OrderRecord {
                amount: d.amount,
                amount_shipping: d.amount_shipping,
                images: d.images,
            },
            timestamp: d.timestamp.to_chrono(),
        }))
    }
}
