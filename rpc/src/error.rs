//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("reveal not found: {0}")]
    NotFound(String),

    #[error("reveal is not unlocked")]
    NotUnlocked,

    #[error("target entity no longer exists")]
    TargetGone,

    #[error("upstream service unavailable: {0}")]
    Upstream(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<fichua_reveal::RevealError> for RpcError {
    fn from(e: fichua_reveal::RevealError) -> Self {
        use fichua_reveal::RevealError;
        match e {
            RevealError::UnknownTarget(t) => RpcError::InvalidRequest(format!("unknown target {t}")),
            RevealError::NotFound(id) => RpcError::NotFound(id),
            RevealError::NotUnlocked => RpcError::NotUnlocked,
            RevealError::TargetGone => RpcError::TargetGone,
            RevealError::Directory(msg) => RpcError::Upstream(msg),
            other => RpcError::Server(other.to_string()),
        }
    }
}

impl From<fichua_types::FichuaError> for RpcError {
    fn from(e: fichua_types::FichuaError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match &self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::NotUnlocked => StatusCode::CONFLICT,
            RpcError::TargetGone => StatusCode::GONE,
            RpcError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Transport and storage details stay in the logs, not in client
        // responses.
        let message = match &self {
            RpcError::Upstream(msg) => {
                tracing::error!(error = %msg, "upstream request failed");
                "upstream service unavailable".to_string()
            }
            RpcError::Server(msg) => {
                tracing::error!(error = %msg, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
