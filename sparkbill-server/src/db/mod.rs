//! Database layer - connection pool, schema, repositories and stores
//!
//! # Design Principles
//!
//! - Connection pool with a small fixed limit - no Arc<Mutex<Connection>>
//! - Rely on DB constraints, surface conflicts - no check-then-insert
//! - Transactions for multi-step operations
//! - Handlers talk to a [`Store`], never to the pool directly

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use store::{BillStore, NewRateCard, PgStore, RateCardStore, Store};
pub use sqlx::PgPool;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("duplicate key value violates unique constraint \"{constraint}\"")]
    UniqueViolation { constraint: &'static str },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
