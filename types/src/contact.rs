//! Protected contact fields returned by a disclosure.

use serde::{Deserialize, Serialize};

/// The protected fields a reveal unlocks. Never the full entity record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    pub name: String,
    pub phone: String,
    pub email: String,
}
