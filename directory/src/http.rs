//! HTTP implementation of the directory adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use fichua_types::{ContactCard, TargetRef};

use crate::{Directory, DirectoryEntry, DirectoryError};

/// Connection settings for the marketplace directory service.
#[derive(Clone, Debug)]
pub struct HttpDirectoryConfig {
    /// Base URL, e.g. `https://directory.internal`.
    pub base_url: String,
    pub timeout: Duration,
}

/// reqwest-backed directory adapter.
pub struct HttpDirectory {
    client: reqwest::Client,
    config: HttpDirectoryConfig,
}

#[derive(Deserialize)]
struct EntryResponse {
    active: bool,
    name: String,
    phone: String,
    email: String,
}

impl HttpDirectory {
    pub fn new(config: HttpDirectoryConfig) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Directory for HttpDirectory {
    async fn lookup(&self, target: &TargetRef) -> Result<DirectoryEntry, DirectoryError> {
        let url = format!(
            "{}/v1/{}/{}/contact",
            self.config.base_url.trim_end_matches('/'),
            target.target_type,
            target.target_id,
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(target.to_string()));
        }
        if !response.status().is_success() {
            return Err(DirectoryError::Transport(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let entry: EntryResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;
        tracing::debug!(target = %target, active = entry.active, "directory lookup");

        Ok(DirectoryEntry {
            active: entry.active,
            contact: ContactCard {
                name: entry.name,
                phone: entry.phone,
                email: entry.email,
            },
        })
    }
}
