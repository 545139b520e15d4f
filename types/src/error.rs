//! Input validation errors shared across crates.
//!
//! Flow-level errors (unknown target, locked reveal, gone target) live in
//! `fichua-reveal`'s `RevealError`; this enum only covers failures to
//! parse client-supplied values into the types in this crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FichuaError {
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("invalid target type: {0}")]
    InvalidTargetType(String),

    #[error("{0}")]
    Other(String),
}
