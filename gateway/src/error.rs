use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider refused the push (bad number, amount, account state).
    /// Not retryable.
    #[error("push rejected by provider: {0}")]
    Rejected(String),

    /// Network-level failure talking to the provider. Retryable once.
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// The provider answered with something we could not interpret.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Whether a single retry is worthwhile.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
