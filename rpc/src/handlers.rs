//! RPC request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use fichua_gateway::CallbackPayload;
use fichua_reveal::RevealError;
use fichua_store::reveal::RevealRecord;
use fichua_types::{ContactCard, GatewayTxnId, Msisdn, RevealId, RevealStatus, TargetRef};

use crate::error::RpcError;
use crate::server::AppState;

// ── Reveal request ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RevealRequestBody {
    pub requester_phone: String,
    pub target_type: String,
    pub target_id: String,
}

#[derive(Serialize)]
pub struct RevealRequestResponse {
    pub reveal_id: String,
    pub status: RevealStatus,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&RevealRecord> for RevealRequestResponse {
    fn from(record: &RevealRecord) -> Self {
        Self {
            reveal_id: record.id.to_string(),
            status: record.status,
            amount: record.amount.raw(),
            reason: record.failure_reason.clone(),
        }
    }
}

pub async fn request_reveal(
    State(state): State<AppState>,
    Json(body): Json<RevealRequestBody>,
) -> Result<(StatusCode, Json<RevealRequestResponse>), RpcError> {
    let requester = Msisdn::parse(&body.requester_phone)?;
    let target_type = body
        .target_type
        .parse()
        .map_err(|e: fichua_types::FichuaError| RpcError::InvalidRequest(e.to_string()))?;
    let target = TargetRef::new(target_type, body.target_id);

    let outcome = state.controller.request_reveal(requester, target).await?;
    let code = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(RevealRequestResponse::from(&outcome.record))))
}

// ── Status polling ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: RevealStatus,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosure: Option<ContactCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, RpcError> {
    let id = RevealId::new(id);
    let record = state.controller.get_status(&id)?;

    let mut response = StatusResponse {
        status: record.status,
        amount: record.amount.raw(),
        disclosure: None,
        reason: record.failure_reason.clone(),
    };

    if record.status == RevealStatus::Completed {
        match state.resolver.resolve_contact(&id).await {
            Ok(contact) => response.disclosure = Some(contact),
            // The reveal itself is valid; report the status and say why
            // the contact fields are missing.
            Err(RevealError::TargetGone) => {
                response.reason = Some("target entity no longer exists".to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(response))
}

// ── Gateway webhook ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CallbackAck {
    pub received: bool,
}

/// Always acknowledges with 200 so the provider stops redelivering;
/// unknown or duplicate transactions are no-ops inside the controller.
pub async fn gateway_callback(
    State(state): State<AppState>,
    Json(payload): Json<CallbackPayload>,
) -> Result<Json<CallbackAck>, RpcError> {
    let txn_id = GatewayTxnId::new(payload.transaction_id.clone());
    if let Some(ref reference) = payload.provider_reference {
        tracing::debug!(txn = %txn_id, reference, "gateway callback received");
    }
    state
        .controller
        .handle_gateway_callback(&txn_id, payload.outcome)
        .await?;
    Ok(Json(CallbackAck { received: true }))
}

// ── Health and metrics ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub reveal_count: u64,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, RpcError> {
    let reveal_count = state
        .controller
        .store()
        .reveal_count()
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok(Json(HealthResponse {
        status: "ok",
        reveal_count,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Result<String, RpcError> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let families = state.controller.metrics().registry.gather();
    let mut buf = Vec::new();
    encoder
        .encode(&families, &mut buf)
        .map_err(|e| RpcError::Server(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| RpcError::Server(e.to_string()))
}
