//! Storage implementations for jobs and contact records.
//!
//! `MemoryStore` is the default backend and the one tests run against;
//! `PostgresStore` (behind the `postgres` feature) persists the same shapes
//! for deployments that need durability across restarts.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
