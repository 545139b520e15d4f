//! LMDB implementation of RevealStore.
//!
//! Databases:
//! - `reveals`: reveal id -> bincode(RevealRecord)
//! - `reveals_by_gateway_txn`: gateway txn id -> reveal id
//! - `active_reveals`: `requester ++ 0x00 ++ target` -> reveal id,
//!   present only while the record is non-terminal
//!
//! Every mutation runs inside a single heed write transaction. LMDB
//! serializes writers, so the read-check-write in
//! `compare_and_set_status` is atomic.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use fichua_store::reveal::{RevealRecord, RevealStore, TransitionUpdate};
use fichua_store::StoreError;
use fichua_types::{GatewayTxnId, Msisdn, RevealId, RevealStatus, TargetRef};

use crate::LmdbError;

pub struct LmdbRevealStore {
    pub(crate) env: Arc<Env>,
    pub(crate) records_db: Database<Bytes, Bytes>,
    pub(crate) gateway_index_db: Database<Bytes, Bytes>,
    pub(crate) active_index_db: Database<Bytes, Bytes>,
}

/// Build the composite key `requester ++ 0x00 ++ "type/id"`. Neither side
/// can contain a NUL byte, so the key is unambiguous.
fn active_key(requester: &Msisdn, target: &TargetRef) -> Vec<u8> {
    let req = requester.as_str().as_bytes();
    let tgt = target.to_string();
    let mut key = Vec::with_capacity(req.len() + 1 + tgt.len());
    key.extend_from_slice(req);
    key.push(0);
    key.extend_from_slice(tgt.as_bytes());
    key
}

impl LmdbRevealStore {
    fn read_record(&self, txn: &heed::RoTxn<'_>, id: &RevealId) -> Result<RevealRecord, LmdbError> {
        let val = self
            .records_db
            .get(txn, id.as_str().as_bytes())?
            .ok_or_else(|| LmdbError::NotFound(format!("reveal {id}")))?;
        Ok(bincode::deserialize(val)?)
    }

    fn write_record(&self, txn: &mut RwTxn<'_>, record: &RevealRecord) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(record)?;
        self.records_db
            .put(txn, record.id.as_str().as_bytes(), &bytes)?;
        Ok(())
    }
}

impl RevealStore for LmdbRevealStore {
    fn put(&self, record: &RevealRecord) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let key = record.id.as_str().as_bytes();
        if self
            .records_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(LmdbError::Duplicate(format!("reveal {}", record.id)).into());
        }

        if record.status.is_active() {
            let akey = active_key(&record.requester, &record.target);
            // Refuse a second active record for the tuple so two racing
            // request handlers cannot both charge the same requester.
            if let Some(existing_id) = self
                .active_index_db
                .get(&wtxn, &akey)
                .map_err(LmdbError::from)?
            {
                let stale = match self.records_db.get(&wtxn, existing_id).map_err(LmdbError::from)? {
                    Some(val) => {
                        let existing: RevealRecord =
                            bincode::deserialize(val).map_err(LmdbError::from)?;
                        existing.status.is_terminal()
                    }
                    None => true,
                };
                if !stale {
                    return Err(
                        LmdbError::Duplicate(format!("active reveal for {}", record.target)).into(),
                    );
                }
            }
            self.active_index_db
                .put(&mut wtxn, &akey, key)
                .map_err(LmdbError::from)?;
        }
        self.write_record(&mut wtxn, record)?;
        if let Some(ref txn_id) = record.gateway_txn_id {
            self.gateway_index_db
                .put(&mut wtxn, txn_id.as_str().as_bytes(), key)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get(&self, id: &RevealId) -> Result<RevealRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_record(&rtxn, id)?)
    }

    fn get_by_gateway_txn(&self, txn_id: &GatewayTxnId) -> Result<RevealRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let id_bytes = self
            .gateway_index_db
            .get(&rtxn, txn_id.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("gateway txn {txn_id}")))?;
        let id = RevealId::new(
            std::str::from_utf8(id_bytes)
                .map_err(|e| LmdbError::Serialization(e.to_string()))?,
        );
        Ok(self.read_record(&rtxn, &id)?)
    }

    fn find_active(
        &self,
        requester: &Msisdn,
        target: &TargetRef,
    ) -> Result<Option<RevealRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let key = active_key(requester, target);
        let id_bytes = match self
            .active_index_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let id = RevealId::new(
            std::str::from_utf8(id_bytes)
                .map_err(|e| LmdbError::Serialization(e.to_string()))?,
        );
        let record = self.read_record(&rtxn, &id)?;
        // A stale index entry for a terminal record is treated as absent.
        if record.status.is_active() {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    fn compare_and_set_status(
        &self,
        id: &RevealId,
        expected: RevealStatus,
        next: RevealStatus,
        update: TransitionUpdate,
    ) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let val = self
            .records_db
            .get(&wtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("reveal {id}")))?;
        let mut record: RevealRecord = bincode::deserialize(val).map_err(LmdbError::from)?;

        if record.status != expected {
            return Ok(false);
        }

        record.status = next;
        if let Some(txn_id) = update.gateway_txn_id {
            self.gateway_index_db
                .put(&mut wtxn, txn_id.as_str().as_bytes(), id.as_str().as_bytes())
                .map_err(LmdbError::from)?;
            record.gateway_txn_id = Some(txn_id);
        }
        if let Some(reason) = update.failure_reason {
            record.failure_reason = Some(reason);
        }
        if let Some(ts) = update.updated_at {
            record.updated_at = ts;
        }

        self.write_record(&mut wtxn, &record)?;

        if next.is_terminal() {
            let akey = active_key(&record.requester, &record.target);
            self.active_index_db
                .delete(&mut wtxn, &akey)
                .map_err(LmdbError::from)?;
        }

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn list_active(&self) -> Result<Vec<RevealRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let iter = self.records_db.iter(&rtxn).map_err(LmdbError::from)?;
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            let record: RevealRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            if record.status.is_active() {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn reveal_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.records_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
