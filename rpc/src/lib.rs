//! HTTP API for the Fichua service.
//!
//! Provides endpoints for:
//! - Requesting a contact reveal (initiates the STK push)
//! - Polling reveal status (with disclosure once completed)
//! - The payment gateway's confirmation webhook
//! - Health and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{build_router, AppState, RpcServer};
