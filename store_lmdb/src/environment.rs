//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::reveal::LmdbRevealStore;
use crate::LmdbError;

/// Default LMDB map size: 256 MiB, plenty for an append-mostly ledger
/// of small records.
pub const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    records_db: Database<Bytes, Bytes>,
    gateway_index_db: Database<Bytes, Bytes>,
    active_index_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Io(e.to_string()))?;

        // Safety: the environment directory is owned by this process and
        // opened exactly once per daemon.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let records_db = env.create_database(&mut wtxn, Some("reveals"))?;
        let gateway_index_db = env.create_database(&mut wtxn, Some("reveals_by_gateway_txn"))?;
        let active_index_db = env.create_database(&mut wtxn, Some("active_reveals"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            records_db,
            gateway_index_db,
            active_index_db,
        })
    }

    /// Build a reveal store backed by this environment.
    pub fn reveal_store(&self) -> LmdbRevealStore {
        LmdbRevealStore {
            env: Arc::clone(&self.env),
            records_db: self.records_db,
            gateway_index_db: self.gateway_index_db,
            active_index_db: self.active_index_db,
        }
    }
}
