//! Reveal request lifecycle status.

use crate::error::FichuaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The lifecycle status of a reveal request.
///
/// Transitions are monotonic:
///
/// ```text
/// Initiated -> AwaitingConfirmation -> Completed | Failed | Expired
/// Initiated -> Failed   (push rejected)
/// Initiated -> Expired  (push never resolved before the deadline)
/// ```
///
/// `Completed`, `Failed`, and `Expired` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStatus {
    /// Created and durably recorded; push prompt not yet accepted.
    Initiated,
    /// The gateway accepted the push; waiting for the payer to confirm.
    AwaitingConfirmation,
    /// Payment confirmed before expiry: contact details are unlocked.
    Completed,
    /// Gateway rejected the push or the payer declined.
    Failed,
    /// No confirmation arrived before the deadline.
    Expired,
}

impl RevealStatus {
    /// Whether no further transition is possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Expired)
    }

    /// Whether this request still occupies the one-active-request slot
    /// for its `(requester, target)` tuple.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for RevealStatus {
    type Err = FichuaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initiated" => Ok(Self::Initiated),
            "awaiting_confirmation" => Ok(Self::AwaitingConfirmation),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "expired" => Ok(Self::Expired),
            other => Err(FichuaError::Other(format!("unknown status '{other}'"))),
        }
    }
}

impl fmt::Display for RevealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
