//! Mobile number type, normalized to E.164.

use crate::error::FichuaError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default country code applied to national-format numbers (Kenya).
const DEFAULT_COUNTRY_CODE: &str = "254";

/// E.164 bounds on significant digits (country code included).
const MIN_DIGITS: usize = 9;
const MAX_DIGITS: usize = 15;

/// A mobile number in canonical E.164 form, always stored with a leading `+`.
///
/// Accepted input formats:
/// - international: `+254700000001`, `254700000001`, `00254700000001`
/// - national (Kenyan): `0700000001`
///
/// Spaces, dashes, and parentheses are tolerated and stripped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Msisdn(String);

impl Msisdn {
    /// Parse and normalize a raw phone number string.
    pub fn parse(raw: &str) -> Result<Self, FichuaError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();

        let digits = if let Some(rest) = cleaned.strip_prefix('+') {
            rest.to_string()
        } else if let Some(rest) = cleaned.strip_prefix("00") {
            rest.to_string()
        } else if let Some(rest) = cleaned.strip_prefix('0') {
            format!("{DEFAULT_COUNTRY_CODE}{rest}")
        } else {
            cleaned.clone()
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(FichuaError::InvalidPhone(raw.to_string()));
        }
        if digits.starts_with('0') {
            return Err(FichuaError::InvalidPhone(raw.to_string()));
        }
        if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
            return Err(FichuaError::InvalidPhone(raw.to_string()));
        }

        Ok(Self(format!("+{digits}")))
    }

    /// Return the canonical `+<digits>` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number without the leading `+`, as some gateways require.
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_passthrough() {
        let m = Msisdn::parse("+254700000001").unwrap();
        assert_eq!(m.as_str(), "+254700000001");
    }

    #[test]
    fn national_gets_country_code() {
        let m = Msisdn::parse("0700000001").unwrap();
        assert_eq!(m.as_str(), "+254700000001");
    }

    #[test]
    fn bare_country_code_form() {
        let m = Msisdn::parse("254700000001").unwrap();
        assert_eq!(m.as_str(), "+254700000001");
    }

    #[test]
    fn double_zero_prefix() {
        let m = Msisdn::parse("00254700000001").unwrap();
        assert_eq!(m.as_str(), "+254700000001");
    }

    #[test]
    fn separators_stripped() {
        let m = Msisdn::parse("+254 700-000 001").unwrap();
        assert_eq!(m.as_str(), "+254700000001");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Msisdn::parse("invalid").is_err());
        assert!(Msisdn::parse("").is_err());
        assert!(Msisdn::parse("+2547abc00001").is_err());
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(Msisdn::parse("+12345678").is_err()); // 8 digits
        assert!(Msisdn::parse("+1234567890123456").is_err()); // 16 digits
    }

    #[test]
    fn digits_drops_plus() {
        let m = Msisdn::parse("+254700000001").unwrap();
        assert_eq!(m.digits(), "254700000001");
    }
}
