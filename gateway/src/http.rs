//! HTTP implementation of the payment gateway adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fichua_types::{Amount, GatewayTxnId, Msisdn};

use crate::{GatewayError, PaymentGateway};

/// Connection settings for the provider's push-payment API.
#[derive(Clone, Debug)]
pub struct HttpGatewayConfig {
    /// Base URL of the provider API, e.g. `https://pay.example.com`.
    pub base_url: String,
    /// Bearer token for the provider.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// reqwest-backed gateway adapter.
pub struct HttpGateway {
    client: reqwest::Client,
    config: HttpGatewayConfig,
}

#[derive(Serialize)]
struct PushRequest<'a> {
    phone: &'a str,
    amount: u64,
    reference: &'a str,
}

#[derive(Deserialize)]
struct PushResponse {
    transaction_id: String,
}

#[derive(Deserialize)]
struct ProviderError {
    message: String,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn initiate_push(
        &self,
        phone: &Msisdn,
        amount: Amount,
        reference: &str,
    ) -> Result<GatewayTxnId, GatewayError> {
        let url = format!("{}/v1/push", self.config.base_url.trim_end_matches('/'));
        let body = PushRequest {
            phone: phone.as_str(),
            amount: amount.raw(),
            reference,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let parsed: PushResponse = response
                .json()
                .await
                .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
            tracing::debug!(reference, txn = %parsed.transaction_id, "push accepted");
            return Ok(GatewayTxnId::new(parsed.transaction_id));
        }

        if status.is_client_error() {
            let message = match response.json::<ProviderError>().await {
                Ok(err) => err.message,
                Err(_) => format!("HTTP {status}"),
            };
            return Err(GatewayError::Rejected(message));
        }

        Err(GatewayError::Transport(format!("HTTP {status}")))
    }
}
