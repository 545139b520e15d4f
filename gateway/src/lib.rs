//! Payment gateway adapter: the external mobile-money boundary.
//!
//! The gateway pushes a payment prompt (STK push) to the payer's phone
//! and later reports the outcome through an at-least-once webhook. This
//! crate defines the adapter trait, the callback payload, and the HTTP
//! implementation against the provider's API.

pub mod callback;
pub mod error;
pub mod http;

pub use callback::{CallbackPayload, PushOutcome};
pub use error::GatewayError;
pub use http::{HttpGateway, HttpGatewayConfig};

use async_trait::async_trait;
use fichua_types::{Amount, GatewayTxnId, Msisdn};

/// Adapter for the external mobile-money provider.
///
/// `initiate_push` returns as soon as the provider has accepted the
/// prompt: it never waits for the payer to enter their PIN. The
/// confirmation arrives later via the callback webhook.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Push a payment prompt to `phone` for `amount`, tagged with an
    /// opaque `reference` the provider echoes back in its callback.
    async fn initiate_push(
        &self,
        phone: &Msisdn,
        amount: Amount,
        reference: &str,
    ) -> Result<GatewayTxnId, GatewayError>;
}
