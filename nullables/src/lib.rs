//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the reveal core (clock, payment gateway,
//! directory, storage) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod directory;
pub mod gateway;
pub mod store;

pub use clock::NullClock;
pub use directory::NullDirectory;
pub use gateway::{NullGateway, RecordedPush};
pub use store::NullStore;
