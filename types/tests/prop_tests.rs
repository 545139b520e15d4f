use proptest::prelude::*;

use fichua_types::{Amount, Msisdn, RevealStatus, Timestamp};

proptest! {
    /// Normalization is idempotent: reparsing a canonical number yields itself.
    #[test]
    fn msisdn_normalization_idempotent(digits in "[1-9][0-9]{8,13}") {
        let first = Msisdn::parse(&digits).unwrap();
        let second = Msisdn::parse(first.as_str()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Canonical form is always `+` followed by 9..=15 digits.
    #[test]
    fn msisdn_canonical_shape(digits in "[1-9][0-9]{8,13}") {
        let m = Msisdn::parse(&digits).unwrap();
        let s = m.as_str();
        prop_assert!(s.starts_with('+'));
        prop_assert!(s[1..].chars().all(|c| c.is_ascii_digit()));
        prop_assert!((9..=15).contains(&(s.len() - 1)));
    }

    /// National-format numbers pick up the default country code.
    #[test]
    fn msisdn_national_prefixed(rest in "[1-9][0-9]{8}") {
        let m = Msisdn::parse(&format!("0{rest}")).unwrap();
        let expected = format!("+254{rest}");
        prop_assert_eq!(m.as_str(), expected.as_str());
    }

    /// Amount bincode serialization roundtrip.
    #[test]
    fn amount_bincode_roundtrip(raw in any::<u64>()) {
        let amount = Amount::new(raw);
        let encoded = bincode::serialize(&amount).unwrap();
        let decoded: Amount = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, amount);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }
}

#[test]
fn status_serde_names_are_snake_case() {
    let s = serde_json::to_string(&RevealStatus::AwaitingConfirmation).unwrap();
    assert_eq!(s, "\"awaiting_confirmation\"");
    let back: RevealStatus = serde_json::from_str(&s).unwrap();
    assert_eq!(back, RevealStatus::AwaitingConfirmation);
}
