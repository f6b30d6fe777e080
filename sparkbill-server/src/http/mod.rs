//! HTTP layer
//!
//! Axum server with:
//! - One router per resource under `/api`
//! - Typed path extractors, 422 for unreadable bodies
//! - JSON error responses
//! - Graceful shutdown

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
