//! orderhook HTTP Server
//!
//! Receives Stripe payment-event webhooks, verifies their signatures, and
//! records fulfilled checkout orders in MongoDB.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderhook_server::app;
use orderhook_server::state::AppState;
use orderhook_store::MongoOrderStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let webhook_secret =
        std::env::var("STRIPE_WEBHOOK_SECRET").context("STRIPE_WEBHOOK_SECRET not set")?;
    let mongo_uri = std::env::var("MONGODB_URI").context("MONGODB_URI not set")?;
    let database = std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "orderhook".into());

    // One credentialed connection per process, opened before traffic
    let store = MongoOrderStore::connect(&mongo_uri, &database)
        .await
        .context("failed to connect to MongoDB")?;

    let state = AppState {
        store: Arc::new(store),
        webhook_secret,
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("orderhook server running on http://{}", addr);
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /webhook/stripe  - Stripe fulfillment webhook");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
