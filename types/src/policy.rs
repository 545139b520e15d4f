//! Fee policy: what a reveal costs per target type.

use crate::amount::Amount;
use crate::target::TargetType;
use serde::{Deserialize, Serialize};

/// Default reveal fee in the smallest currency unit.
pub const DEFAULT_REVEAL_FEE: u64 = 150;

/// Per-target-type reveal fee table.
///
/// Every entry defaults to [`DEFAULT_REVEAL_FEE`]; operators can override
/// individual entries from the TOML config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeePolicy {
    /// Fee for unlocking a property listing's landlord contact.
    #[serde(default = "default_fee")]
    pub property_fee: Amount,

    /// Fee for unlocking a fundi's contact.
    #[serde(default = "default_fee")]
    pub fundi_fee: Amount,

    /// Fee for unlocking a short-stay host's contact.
    #[serde(default = "default_fee")]
    pub stay_fee: Amount,
}

fn default_fee() -> Amount {
    Amount::new(DEFAULT_REVEAL_FEE)
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            property_fee: default_fee(),
            fundi_fee: default_fee(),
            stay_fee: default_fee(),
        }
    }
}

impl FeePolicy {
    /// The fee charged for revealing a target of the given type.
    pub fn fee_for(&self, target_type: TargetType) -> Amount {
        match target_type {
            TargetType::Property => self.property_fee,
            TargetType::Fundi => self.fundi_fee,
            TargetType::Stay => self.stay_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_150_everywhere() {
        let policy = FeePolicy::default();
        for t in [TargetType::Property, TargetType::Fundi, TargetType::Stay] {
            assert_eq!(policy.fee_for(t), Amount::new(150));
        }
    }

    #[test]
    fn per_type_override() {
        let policy = FeePolicy {
            fundi_fee: Amount::new(200),
            ..FeePolicy::default()
        };
        assert_eq!(policy.fee_for(TargetType::Fundi), Amount::new(200));
        assert_eq!(policy.fee_for(TargetType::Stay), Amount::new(150));
    }
}
