//! # orderhook-store
//!
//! MongoDB-backed [`OrderStore`](orderhook_payments::OrderStore)
//! implementation for orderhook.
//!
//! The client is constructed once at process start, before the server
//! accepts traffic, and the same credentialed handle is shared by every
//! request for the lifetime of the process.

mod mongo;

pub use mongo::MongoOrderStore;
