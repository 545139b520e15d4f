//! Directory adapter: read-only lookups against the marketplace's
//! property/fundi/stay listing service.
//!
//! Consumed twice: by the reveal controller for the existence check at
//! request time, and by the disclosure resolver for the field lookup
//! after payment.

pub mod error;
pub mod http;

pub use error::DirectoryError;
pub use http::{HttpDirectory, HttpDirectoryConfig};

use async_trait::async_trait;
use fichua_types::{ContactCard, TargetRef};

/// A directory entry for one target entity.
#[derive(Clone, Debug)]
pub struct DirectoryEntry {
    /// Whether the listing is live (not delisted or suspended).
    pub active: bool,
    /// The protected contact fields.
    pub contact: ContactCard,
}

/// Read-only external directory of marketplace entities.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Look up a target. `NotFound` means the entity never existed or
    /// was hard-deleted.
    async fn lookup(&self, target: &TargetRef) -> Result<DirectoryEntry, DirectoryError>;
}
