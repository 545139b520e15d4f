//! Reveal ledger storage trait.
//!
//! One record per reveal attempt. Records are append-mostly: they are
//! never deleted, and once a record reaches a terminal status the only
//! writer that could touch it again loses the compare-and-set.

use crate::StoreError;
use fichua_types::{
    Amount, ContactCard, GatewayTxnId, Msisdn, RevealId, RevealStatus, TargetRef, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Durable record of one contact-reveal attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevealRecord {
    pub id: RevealId,
    /// The payer's mobile number (E.164).
    pub requester: Msisdn,
    /// The entity whose contact is being unlocked.
    pub target: TargetRef,
    /// Fee charged, from the fee policy at creation time.
    pub amount: Amount,
    pub status: RevealStatus,
    /// External reference from the gateway; set once the push is accepted.
    pub gateway_txn_id: Option<GatewayTxnId>,
    /// Contact fields captured at request time. Served as a fallback when
    /// the target is delisted after payment.
    pub contact_snapshot: Option<ContactCard>,
    /// Human-readable reason for a `Failed` record.
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Confirmations arriving after this deadline are rejected into `Expired`.
    pub expires_at: Timestamp,
}

impl RevealRecord {
    /// Whether the record's deadline has passed at `now`.
    pub fn is_past_deadline(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// Fields applied alongside a status transition.
///
/// `None` fields are left untouched, so a losing CAS writer can never
/// clobber data the winner wrote.
#[derive(Clone, Debug, Default)]
pub struct TransitionUpdate {
    pub gateway_txn_id: Option<GatewayTxnId>,
    pub failure_reason: Option<String>,
    pub updated_at: Option<Timestamp>,
}

/// Trait for the reveal ledger.
///
/// The compare-and-set transition is the coordination primitive the whole
/// service relies on: concurrent gateway callbacks and the expiry sweep
/// all race through it, and exactly one writer wins the terminal
/// transition for any record.
pub trait RevealStore: Send + Sync {
    /// Insert a new record. Fails with `Duplicate` if the id exists.
    fn put(&self, record: &RevealRecord) -> Result<(), StoreError>;

    /// Retrieve a record by id.
    fn get(&self, id: &RevealId) -> Result<RevealRecord, StoreError>;

    /// Retrieve a record by the gateway's transaction reference.
    fn get_by_gateway_txn(&self, txn_id: &GatewayTxnId) -> Result<RevealRecord, StoreError>;

    /// Find the non-terminal record for a `(requester, target)` tuple,
    /// if one exists. Backs the one-active-request invariant.
    fn find_active(
        &self,
        requester: &Msisdn,
        target: &TargetRef,
    ) -> Result<Option<RevealRecord>, StoreError>;

    /// Atomic status transition: if the record's current status equals
    /// `expected`, set it to `next`, apply `update`, and return `true`.
    /// Otherwise change nothing and return `false`.
    fn compare_and_set_status(
        &self,
        id: &RevealId,
        expected: RevealStatus,
        next: RevealStatus,
        update: TransitionUpdate,
    ) -> Result<bool, StoreError>;

    /// All records in an active status (sweep input). Covers both
    /// `Initiated` and `AwaitingConfirmation`: a record can stall in
    /// `Initiated` when the requester disconnects mid-push, and the
    /// sweep must reclaim its tuple too.
    fn list_active(&self) -> Result<Vec<RevealRecord>, StoreError>;

    /// Total number of reveal records ever created.
    fn reveal_count(&self) -> Result<u64, StoreError>;
}
