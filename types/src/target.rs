//! Reveal target types: what kind of entity is being unlocked.

use crate::error::FichuaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of marketplace entity whose contact details can be unlocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// A long-term rental property listing.
    Property,
    /// A service provider (plumber, electrician, mason, ...).
    Fundi,
    /// A short-stay listing.
    Stay,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Fundi => "fundi",
            Self::Stay => "stay",
        }
    }
}

impl FromStr for TargetType {
    type Err = FichuaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "property" => Ok(Self::Property),
            "fundi" => Ok(Self::Fundi),
            "stay" => Ok(Self::Stay),
            other => Err(FichuaError::InvalidTargetType(other.to_string())),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `(target_type, target_id)` pair naming one entity in the directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub target_type: TargetType,
    pub target_id: String,
}

impl TargetRef {
    pub fn new(target_type: TargetType, target_id: impl Into<String>) -> Self {
        Self {
            target_type,
            target_id: target_id.into(),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target_type, self.target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_type_roundtrip() {
        for t in [TargetType::Property, TargetType::Fundi, TargetType::Stay] {
            assert_eq!(t.as_str().parse::<TargetType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_target_type_rejected() {
        assert!("boat".parse::<TargetType>().is_err());
    }

    #[test]
    fn target_ref_display() {
        let t = TargetRef::new(TargetType::Fundi, "42");
        assert_eq!(t.to_string(), "fundi/42");
    }
}
