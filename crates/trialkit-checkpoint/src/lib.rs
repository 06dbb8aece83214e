//! Durable checkpoint store (C4): one `CheckpointStore` trait, a Postgres
//! implementation behind the `database` feature, and an in-memory
//! implementation that also serves as the no-op test fallback.

pub mod memory;
pub mod traits;

#[cfg(feature = "database")]
pub mod postgres;

pub use memory::InMemoryCheckpointStore;
pub use traits::{CheckpointError, CheckpointStore};

#[cfg(feature = "database")]
pub use postgres::PostgresCheckpointStore;
