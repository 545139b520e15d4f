//! Abstract storage traits for the Fichua reveal ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod reveal;

pub use error::StoreError;
pub use reveal::{RevealRecord, RevealStore, TransitionUpdate};
