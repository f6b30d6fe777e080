//! PostgreSQL repositories
//!
//! Each repository follows these patterns:
//! - Borrows the pool; one statement or one transaction per call
//! - Column lists come from the `models::naming` tables
//! - Multi-step writes (card + items, parent check + insert) use a transaction

pub mod bills;
mod items;
pub mod rate_cards;

pub use bills::BillRepo;
pub use items::ItemRepo;
pub use rate_cards::RateCardRepo;
