//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use fichua_types::FeePolicy;

use crate::error::RevealError;

/// Configuration for the Fichua service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`]
/// or built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Data directory for the LMDB ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Seconds from creation until an unconfirmed reveal expires.
    #[serde(default = "default_reveal_ttl_secs")]
    pub reveal_ttl_secs: u64,

    /// Interval between expiry sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Per-target-type reveal fees.
    #[serde(default)]
    pub fees: FeePolicy,

    /// Payment gateway connection settings.
    #[serde(default)]
    pub gateway: GatewaySettings,

    /// Marketplace directory connection settings.
    #[serde(default)]
    pub directory: DirectorySettings,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectorySettings {
    #[serde(default = "default_directory_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./fichua_data")
}

fn default_reveal_ttl_secs() -> u64 {
    600
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_gateway_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_directory_url() -> String {
    "http://localhost:9091".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            api_key: String::new(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: default_directory_url(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            data_dir: default_data_dir(),
            reveal_ttl_secs: default_reveal_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            fees: FeePolicy::default(),
            gateway: GatewaySettings::default(),
            directory: DirectorySettings::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, RevealError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RevealError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&contents)
            .map_err(|e| RevealError::Config(format!("parse {}: {e}", path.display())))
    }
}
