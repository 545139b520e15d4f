//! The reveal core: a race-free pay-to-unlock state machine.
//!
//! A reveal request moves through a small monotonic state machine driven
//! by the payment gateway:
//!
//! ```text
//! initiated --(gateway accepts push)--> awaiting_confirmation
//! initiated --(gateway rejects/errors)--> failed
//! initiated --(deadline, push never resolved)--> expired
//! awaiting_confirmation --(success before deadline)--> completed
//! awaiting_confirmation --(failure)--> failed
//! awaiting_confirmation --(deadline, no confirmation)--> expired
//! ```
//!
//! All coordination goes through the store's compare-and-set transition:
//! duplicated or out-of-order gateway callbacks and the expiry sweep race
//! safely, with exactly one winner per record.

pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod sweep;

pub use config::ServiceConfig;
pub use controller::{RevealController, RevealOutcome};
pub use error::RevealError;
pub use metrics::RevealMetrics;
pub use resolver::DisclosureResolver;
pub use sweep::run_sweeper;
