//! Gateway callback payload types.
//!
//! The provider delivers these at-least-once, in any order, possibly
//! duplicated. The reveal controller's compare-and-set transition makes
//! redelivery harmless.

use serde::{Deserialize, Serialize};

/// The payer's final answer to the push prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushOutcome {
    /// Payment authorized and captured.
    Success,
    /// Payer declined, timed out at the provider, or had insufficient funds.
    Failure,
}

/// Webhook body posted by the provider when a push resolves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallbackPayload {
    /// The transaction id returned by `initiate_push`.
    pub transaction_id: String,
    pub outcome: PushOutcome,
    /// Provider-side receipt reference, logged for reconciliation.
    pub provider_reference: Option<String>,
}
