//! Timestamp type and clock abstraction.
//!
//! Timestamps are Unix epoch seconds (UTC). The `Clock` trait lets the
//! reveal controller read time through an injectable source so expiry
//! behavior is testable with a controlled clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs` (saturating).
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Injectable time source.
///
/// Production code uses [`SystemClock`]; tests use a manually advanced
/// clock so expiry deadlines can be crossed deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Clock backed by the real system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_saturates() {
        let t = Timestamp::new(u64::MAX - 1);
        assert_eq!(t.plus_secs(10).as_secs(), u64::MAX);
    }

    #[test]
    fn elapsed_since_never_underflows() {
        let later = Timestamp::new(100);
        let earlier = Timestamp::new(50);
        assert_eq!(later.elapsed_since(earlier), 0);
        assert_eq!(earlier.elapsed_since(later), 50);
    }
}
