//! SQLite adapters for the event and trace stores.

pub mod connection;
pub mod event_store;
pub mod trace_store;

pub use connection::{create_pool, create_test_pool, ConnectionError, PoolConfig};
pub use event_store::SqliteEventStore;
pub use trace_store::SqliteTraceStore;
