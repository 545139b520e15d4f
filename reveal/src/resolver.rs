//! Disclosure resolver: turns a completed reveal into contact fields.

use std::sync::Arc;

use fichua_directory::{Directory, DirectoryError};
use fichua_store::reveal::RevealStore;
use fichua_store::StoreError;
use fichua_types::{ContactCard, RevealId, RevealStatus};

use crate::error::RevealError;

/// Resolves the protected contact fields for a completed reveal.
///
/// Only ever returns the protected fields (name, phone, email), never the
/// full entity record.
pub struct DisclosureResolver {
    store: Arc<dyn RevealStore>,
    directory: Arc<dyn Directory>,
}

impl DisclosureResolver {
    pub fn new(store: Arc<dyn RevealStore>, directory: Arc<dyn Directory>) -> Self {
        Self { store, directory }
    }

    /// Return the contact card for a completed reveal.
    ///
    /// The directory is consulted for fresh fields; if the target has
    /// been delisted since payment, the snapshot captured at request
    /// time is served instead: the requester already paid for it.
    /// `TargetGone` surfaces only when no snapshot survives either.
    pub async fn resolve_contact(&self, id: &RevealId) -> Result<ContactCard, RevealError> {
        let record = match self.store.get(id) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => return Err(RevealError::NotFound(id.to_string())),
            Err(e) => return Err(e.into()),
        };

        if record.status != RevealStatus::Completed {
            return Err(RevealError::NotUnlocked);
        }

        match self.directory.lookup(&record.target).await {
            Ok(entry) if entry.active => Ok(entry.contact),
            Ok(_) | Err(DirectoryError::NotFound(_)) => {
                match record.contact_snapshot {
                    Some(snapshot) => {
                        tracing::info!(id = %record.id, target = %record.target,
                            "target delisted, serving contact snapshot");
                        Ok(snapshot)
                    }
                    None => Err(RevealError::TargetGone),
                }
            }
            Err(e) => Err(RevealError::Directory(e.to_string())),
        }
    }
}
