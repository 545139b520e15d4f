//! Periodic expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use crate::controller::RevealController;

/// Run the expiry sweep on a fixed interval until the task is aborted.
///
/// Racing a sweep tick against callback handling is safe: the store's
/// compare-and-set lets exactly one of them win any given record.
pub async fn run_sweeper(controller: Arc<RevealController>, interval_secs: u64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; that is fine, a fresh start has
    // nothing to expire.
    loop {
        ticker.tick().await;
        match controller.sweep_expired() {
            Ok(0) => {}
            Ok(n) => tracing::info!(count = n, "expired unconfirmed reveals"),
            Err(e) => tracing::error!(error = %e, "expiry sweep failed"),
        }
    }
}
