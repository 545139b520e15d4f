//! Nullable store: thread-safe in-memory reveal ledger for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use fichua_store::reveal::{RevealRecord, RevealStore, TransitionUpdate};
use fichua_store::StoreError;
use fichua_types::{GatewayTxnId, Msisdn, RevealId, RevealStatus, TargetRef};

/// An in-memory reveal store for testing.
///
/// Thread-safe for use with tokio's multi-threaded runtime. The single
/// `Mutex` makes `compare_and_set_status` atomic, matching the LMDB
/// backend's single-writer guarantee.
pub struct NullStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, RevealRecord>,
    by_gateway_txn: HashMap<String, String>,
    active: HashMap<String, String>,
}

fn active_key(requester: &Msisdn, target: &TargetRef) -> String {
    format!("{}\0{}", requester, target)
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealStore for NullStore {
    fn put(&self, record: &RevealRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id = record.id.as_str().to_string();
        if inner.records.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("reveal {}", record.id)));
        }
        if record.status.is_active() {
            let akey = active_key(&record.requester, &record.target);
            if let Some(existing_id) = inner.active.get(&akey) {
                if inner
                    .records
                    .get(existing_id)
                    .is_some_and(|r| r.status.is_active())
                {
                    return Err(StoreError::Duplicate(format!(
                        "active reveal for {}",
                        record.target
                    )));
                }
            }
            inner.active.insert(akey, id.clone());
        }
        if let Some(ref txn_id) = record.gateway_txn_id {
            inner
                .by_gateway_txn
                .insert(txn_id.as_str().to_string(), id.clone());
        }
        inner.records.insert(id, record.clone());
        Ok(())
    }

    fn get(&self, id: &RevealId) -> Result<RevealRecord, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("reveal {id}")))
    }

    fn get_by_gateway_txn(&self, txn_id: &GatewayTxnId) -> Result<RevealRecord, StoreError> {
        let inner = self.inner.lock().unwrap();
        let id = inner
            .by_gateway_txn
            .get(txn_id.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("gateway txn {txn_id}")))?;
        inner
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("reveal {id}")))
    }

    fn find_active(
        &self,
        requester: &Msisdn,
        target: &TargetRef,
    ) -> Result<Option<RevealRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let akey = active_key(requester, target);
        Ok(inner
            .active
            .get(&akey)
            .and_then(|id| inner.records.get(id))
            .filter(|r| r.status.is_active())
            .cloned())
    }

    fn compare_and_set_status(
        &self,
        id: &RevealId,
        expected: RevealStatus,
        next: RevealStatus,
        update: TransitionUpdate,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("reveal {id}")))?;

        if record.status != expected {
            return Ok(false);
        }

        let mut updated = record;
        updated.status = next;
        if let Some(txn_id) = update.gateway_txn_id {
            inner
                .by_gateway_txn
                .insert(txn_id.as_str().to_string(), id.as_str().to_string());
            updated.gateway_txn_id = Some(txn_id);
        }
        if let Some(reason) = update.failure_reason {
            updated.failure_reason = Some(reason);
        }
        if let Some(ts) = update.updated_at {
            updated.updated_at = ts;
        }
        if next.is_terminal() {
            let akey = active_key(&updated.requester, &updated.target);
            inner.active.remove(&akey);
        }
        inner.records.insert(id.as_str().to_string(), updated);
        Ok(true)
    }

    fn list_active(&self) -> Result<Vec<RevealRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .records
            .values()
            .filter(|r| r.status.is_active())
            .cloned()
            .collect())
    }

    fn reveal_count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().unwrap().records.len() as u64)
    }
}
