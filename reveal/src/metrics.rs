//! Prometheus metrics for the reveal service.
//!
//! The [`RevealMetrics`] struct owns a dedicated [`Registry`] that the
//! RPC `/metrics` endpoint encodes into the Prometheus text exposition
//! format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Central collection of reveal-service metrics.
pub struct RevealMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// New reveal records created (idempotent merges not counted).
    pub reveals_requested: IntCounter,
    /// Push prompts accepted by the gateway.
    pub pushes_initiated: IntCounter,
    /// Reveals that reached `completed`.
    pub reveals_completed: IntCounter,
    /// Reveals that reached `failed` (push rejected or payment declined).
    pub reveals_failed: IntCounter,
    /// Reveals that reached `expired` (sweep or late confirmation).
    pub reveals_expired: IntCounter,
    /// Gateway callbacks that found the record already terminal.
    pub duplicate_callbacks: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Records currently in `awaiting_confirmation`.
    pub awaiting_confirmation: IntGauge,
}

impl RevealMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let reveals_requested = register_int_counter_with_registry!(
            Opts::new("fichua_reveals_requested_total", "Reveal records created"),
            registry
        )
        .expect("register reveals_requested");
        let pushes_initiated = register_int_counter_with_registry!(
            Opts::new(
                "fichua_pushes_initiated_total",
                "Push prompts accepted by the gateway"
            ),
            registry
        )
        .expect("register pushes_initiated");
        let reveals_completed = register_int_counter_with_registry!(
            Opts::new(
                "fichua_reveals_completed_total",
                "Reveals confirmed and unlocked"
            ),
            registry
        )
        .expect("register reveals_completed");
        let reveals_failed = register_int_counter_with_registry!(
            Opts::new("fichua_reveals_failed_total", "Reveals that failed"),
            registry
        )
        .expect("register reveals_failed");
        let reveals_expired = register_int_counter_with_registry!(
            Opts::new(
                "fichua_reveals_expired_total",
                "Reveals expired without confirmation"
            ),
            registry
        )
        .expect("register reveals_expired");
        let duplicate_callbacks = register_int_counter_with_registry!(
            Opts::new(
                "fichua_duplicate_callbacks_total",
                "Gateway callbacks ignored as duplicates"
            ),
            registry
        )
        .expect("register duplicate_callbacks");
        let awaiting_confirmation = register_int_gauge_with_registry!(
            Opts::new(
                "fichua_awaiting_confirmation",
                "Reveals currently awaiting payer confirmation"
            ),
            registry
        )
        .expect("register awaiting_confirmation");

        Self {
            registry,
            reveals_requested,
            pushes_initiated,
            reveals_completed,
            reveals_failed,
            reveals_expired,
            duplicate_callbacks,
            awaiting_confirmation,
        }
    }
}

impl Default for RevealMetrics {
    fn default() -> Self {
        Self::new()
    }
}
