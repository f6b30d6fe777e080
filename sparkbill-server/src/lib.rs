//! sparkbill-server: bills and rate cards over HTTP
//!
//! Stores invoices (bills with line items) and price lists (rate cards with
//! ordered service entries) in PostgreSQL and serves them as JSON under
//! `/api`.
//!
//! # Modules
//!
//! - [`db`]: pool, schema bootstrap, repositories, storage traits, seeding
//! - [`models`]: wire types, naming translation, validation, amount in words
//! - [`http`]: routes, extractors, error mapping, server bootstrap

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbError, MemoryStore, PgStore, Store};
pub use http::{run_server, ServerConfig, ServerError};
