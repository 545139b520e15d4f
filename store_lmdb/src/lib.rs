//! LMDB storage backend for the Fichua reveal ledger.
//!
//! Implements the `fichua-store` traits using the `heed` LMDB bindings.
//! Three databases live in a single environment: the records themselves,
//! a gateway-transaction-id index, and an active-tuple index backing the
//! one-active-request invariant. LMDB's single-writer transactions are
//! what make the compare-and-set transition atomic.

pub mod environment;
pub mod error;
pub mod reveal;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use reveal::LmdbRevealStore;
