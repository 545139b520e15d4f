//! The reveal controller: every transition of a reveal record goes
//! through here.

use std::sync::Arc;
use std::time::Duration;

use fichua_directory::{Directory, DirectoryError};
use fichua_gateway::{GatewayError, PaymentGateway, PushOutcome};
use fichua_store::reveal::{RevealRecord, RevealStore, TransitionUpdate};
use fichua_store::StoreError;
use fichua_types::{Clock, FeePolicy, GatewayTxnId, Msisdn, RevealId, RevealStatus, TargetRef};

use crate::error::RevealError;
use crate::metrics::RevealMetrics;

/// Pause before the single retry of a failed push initiation. The caller
/// is waiting synchronously, so there is no second retry.
const PUSH_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Result of a reveal request: the current record plus whether this call
/// created it (as opposed to merging into an existing active request).
#[derive(Debug)]
pub struct RevealOutcome {
    pub record: RevealRecord,
    pub created: bool,
}

/// Governs one contact-reveal transaction per `(requester, target)` pair.
///
/// Holds no mutable state of its own: all coordination is pushed into the
/// store's compare-and-set transition, so the controller can be shared
/// freely across concurrent request handlers.
pub struct RevealController {
    store: Arc<dyn RevealStore>,
    gateway: Arc<dyn PaymentGateway>,
    directory: Arc<dyn Directory>,
    clock: Arc<dyn Clock>,
    fees: FeePolicy,
    reveal_ttl_secs: u64,
    metrics: Arc<RevealMetrics>,
}

impl RevealController {
    pub fn new(
        store: Arc<dyn RevealStore>,
        gateway: Arc<dyn PaymentGateway>,
        directory: Arc<dyn Directory>,
        clock: Arc<dyn Clock>,
        fees: FeePolicy,
        reveal_ttl_secs: u64,
        metrics: Arc<RevealMetrics>,
    ) -> Self {
        Self {
            store,
            gateway,
            directory,
            clock,
            fees,
            reveal_ttl_secs,
            metrics,
        }
    }

    pub fn metrics(&self) -> &RevealMetrics {
        &self.metrics
    }

    pub fn store(&self) -> &Arc<dyn RevealStore> {
        &self.store
    }

    /// Request a contact reveal: validate the target, record the request,
    /// and push a payment prompt to the requester's phone.
    ///
    /// Idempotent per `(requester, target)`: while a previous request for
    /// the same tuple is non-terminal, that request is returned unchanged
    /// and no second charge is initiated.
    pub async fn request_reveal(
        &self,
        requester: Msisdn,
        target: TargetRef,
    ) -> Result<RevealOutcome, RevealError> {
        let entry = match self.directory.lookup(&target).await {
            Ok(entry) => entry,
            Err(DirectoryError::NotFound(_)) => {
                return Err(RevealError::UnknownTarget(target.to_string()))
            }
            Err(e) => return Err(RevealError::Directory(e.to_string())),
        };
        if !entry.active {
            return Err(RevealError::UnknownTarget(target.to_string()));
        }

        if let Some(existing) = self.store.find_active(&requester, &target)? {
            tracing::debug!(id = %existing.id, "returning existing active reveal");
            return Ok(RevealOutcome {
                record: existing,
                created: false,
            });
        }

        let now = self.clock.now();
        let record = RevealRecord {
            id: RevealId::generate(),
            requester: requester.clone(),
            target: target.clone(),
            amount: self.fees.fee_for(target.target_type),
            status: RevealStatus::Initiated,
            gateway_txn_id: None,
            contact_snapshot: Some(entry.contact),
            failure_reason: None,
            created_at: now,
            updated_at: now,
            expires_at: now.plus_secs(self.reveal_ttl_secs),
        };

        // Durably recorded before any money can move. A concurrent
        // request for the same tuple loses the insert and merges into
        // the winner's record.
        match self.store.put(&record) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                if let Some(existing) = self.store.find_active(&requester, &target)? {
                    return Ok(RevealOutcome {
                        record: existing,
                        created: false,
                    });
                }
                return Err(RevealError::Store(StoreError::Duplicate(
                    record.id.to_string(),
                )));
            }
            Err(e) => return Err(e.into()),
        }
        self.metrics.reveals_requested.inc();
        tracing::info!(id = %record.id, target = %target, amount = %record.amount, "reveal initiated");

        match self.push_with_retry(&record).await {
            Ok(txn_id) => {
                let applied = self.store.compare_and_set_status(
                    &record.id,
                    RevealStatus::Initiated,
                    RevealStatus::AwaitingConfirmation,
                    TransitionUpdate {
                        gateway_txn_id: Some(txn_id.clone()),
                        updated_at: Some(self.clock.now()),
                        ..TransitionUpdate::default()
                    },
                )?;
                if applied {
                    self.metrics.pushes_initiated.inc();
                    self.metrics.awaiting_confirmation.inc();
                    tracing::info!(id = %record.id, txn = %txn_id, "push accepted, awaiting confirmation");
                }
            }
            Err(e) => {
                let applied = self.store.compare_and_set_status(
                    &record.id,
                    RevealStatus::Initiated,
                    RevealStatus::Failed,
                    TransitionUpdate {
                        failure_reason: Some(e.to_string()),
                        updated_at: Some(self.clock.now()),
                        ..TransitionUpdate::default()
                    },
                )?;
                if applied {
                    self.metrics.reveals_failed.inc();
                }
                tracing::warn!(id = %record.id, error = %e, "push initiation failed");
            }
        }

        Ok(RevealOutcome {
            record: self.store.get(&record.id)?,
            created: true,
        })
    }

    /// One retry with a short backoff on transport errors; rejections are
    /// final.
    async fn push_with_retry(&self, record: &RevealRecord) -> Result<GatewayTxnId, GatewayError> {
        let first = self
            .gateway
            .initiate_push(&record.requester, record.amount, record.id.as_str())
            .await;
        match first {
            Err(ref e) if e.is_transient() => {
                tracing::debug!(id = %record.id, error = %e, "push transport error, retrying once");
                tokio::time::sleep(PUSH_RETRY_BACKOFF).await;
                self.gateway
                    .initiate_push(&record.requester, record.amount, record.id.as_str())
                    .await
            }
            other => other,
        }
    }

    /// Apply a gateway confirmation.
    ///
    /// Unknown transaction ids and already-terminal records are accepted
    /// as no-ops: providers redeliver callbacks, and the callback for a
    /// push may even arrive before our own awaiting transition commits;
    /// in that case the index lookup misses and the provider's retry
    /// lands later.
    pub async fn handle_gateway_callback(
        &self,
        txn_id: &GatewayTxnId,
        outcome: PushOutcome,
    ) -> Result<(), RevealError> {
        let record = match self.store.get_by_gateway_txn(txn_id) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(txn = %txn_id, "callback for unknown transaction, ignoring");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if record.status.is_terminal() {
            self.metrics.duplicate_callbacks.inc();
            tracing::debug!(id = %record.id, status = %record.status, "callback for terminal reveal, ignoring");
            return Ok(());
        }

        let now = self.clock.now();

        // A confirmation past the deadline never unlocks, success or not.
        // Funds reconciliation for a late capture is a billing concern.
        if record.is_past_deadline(now) {
            let applied = self.store.compare_and_set_status(
                &record.id,
                RevealStatus::AwaitingConfirmation,
                RevealStatus::Expired,
                TransitionUpdate {
                    updated_at: Some(now),
                    ..TransitionUpdate::default()
                },
            )?;
            if applied {
                self.metrics.reveals_expired.inc();
                self.metrics.awaiting_confirmation.dec();
                tracing::warn!(id = %record.id, txn = %txn_id, ?outcome, "late confirmation, reveal expired");
            }
            return Ok(());
        }

        let next = match outcome {
            PushOutcome::Success => RevealStatus::Completed,
            PushOutcome::Failure => RevealStatus::Failed,
        };
        let update = TransitionUpdate {
            failure_reason: match outcome {
                PushOutcome::Failure => Some("payment declined".to_string()),
                PushOutcome::Success => None,
            },
            updated_at: Some(now),
            ..TransitionUpdate::default()
        };

        let applied = self.store.compare_and_set_status(
            &record.id,
            RevealStatus::AwaitingConfirmation,
            next,
            update,
        )?;
        if applied {
            self.metrics.awaiting_confirmation.dec();
            match next {
                RevealStatus::Completed => {
                    self.metrics.reveals_completed.inc();
                    tracing::info!(id = %record.id, txn = %txn_id, "payment confirmed, contact unlocked");
                }
                _ => {
                    self.metrics.reveals_failed.inc();
                    tracing::info!(id = %record.id, txn = %txn_id, "payment declined");
                }
            }
        } else {
            self.metrics.duplicate_callbacks.inc();
            tracing::debug!(id = %record.id, txn = %txn_id, "lost transition race, ignoring");
        }
        Ok(())
    }

    /// Current state of a reveal. Read-only, safe to poll at any rate.
    pub fn get_status(&self, id: &RevealId) -> Result<RevealRecord, RevealError> {
        match self.store.get(id) {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(_)) => Err(RevealError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Transition every active record past its deadline to `expired`.
    /// Returns how many records were expired.
    ///
    /// Covers `Initiated` as well as `AwaitingConfirmation`: a request
    /// whose handler was dropped between the insert and the push CAS
    /// would otherwise hold its `(requester, target)` tuple forever.
    ///
    /// Safe to run concurrently with callback handling: a callback that
    /// lands first wins the compare-and-set and the sweep's attempt
    /// no-ops, and vice versa.
    pub fn sweep_expired(&self) -> Result<u64, RevealError> {
        let now = self.clock.now();
        let mut expired = 0u64;
        for record in self.store.list_active()? {
            if !record.is_past_deadline(now) {
                continue;
            }
            let applied = self.store.compare_and_set_status(
                &record.id,
                record.status,
                RevealStatus::Expired,
                TransitionUpdate {
                    updated_at: Some(now),
                    ..TransitionUpdate::default()
                },
            )?;
            if applied {
                expired += 1;
                self.metrics.reveals_expired.inc();
                if record.status == RevealStatus::AwaitingConfirmation {
                    self.metrics.awaiting_confirmation.dec();
                }
                tracing::info!(id = %record.id, from = %record.status, "reveal expired without confirmation");
            }
        }
        Ok(expired)
    }
}
