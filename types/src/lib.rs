//! Fundamental types for the Fichua contact-reveal service.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: phone numbers, reveal targets, identifiers, amounts, timestamps,
//! status enums, and the fee policy.

pub mod amount;
pub mod contact;
pub mod error;
pub mod id;
pub mod msisdn;
pub mod policy;
pub mod status;
pub mod target;
pub mod time;

pub use amount::Amount;
pub use contact::ContactCard;
pub use error::FichuaError;
pub use id::{GatewayTxnId, RevealId};
pub use msisdn::Msisdn;
pub use policy::FeePolicy;
pub use status::RevealStatus;
pub use target::{TargetRef, TargetType};
pub use time::{Clock, SystemClock, Timestamp};
