//! Nullable directory: an in-memory map of marketplace entities.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use fichua_directory::{Directory, DirectoryEntry, DirectoryError};
use fichua_types::{ContactCard, TargetRef};

/// A test directory backed by a `HashMap`.
pub struct NullDirectory {
    entries: Mutex<HashMap<String, DirectoryEntry>>,
}

impl NullDirectory {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register an active entity with the given contact fields.
    pub fn insert(&self, target: &TargetRef, contact: ContactCard) {
        self.entries.lock().unwrap().insert(
            target.to_string(),
            DirectoryEntry {
                active: true,
                contact,
            },
        );
    }

    /// Mark an entity inactive (delisted) while keeping it on record.
    pub fn deactivate(&self, target: &TargetRef) {
        if let Some(entry) = self.entries.lock().unwrap().get_mut(&target.to_string()) {
            entry.active = false;
        }
    }

    /// Remove an entity entirely, as a hard delete would.
    pub fn remove(&self, target: &TargetRef) {
        self.entries.lock().unwrap().remove(&target.to_string());
    }
}

impl Default for NullDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Directory for NullDirectory {
    async fn lookup(&self, target: &TargetRef) -> Result<DirectoryEntry, DirectoryError> {
        self.entries
            .lock()
            .unwrap()
            .get(&target.to_string())
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(target.to_string()))
    }
}
