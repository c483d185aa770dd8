//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::ProtocolConstants;
use crate::error::{QearnError, Result};
use crate::history::HistoryConfig;
use crate::types::RpcConfig;

/// Top-level configuration, usually read from `qearn.toml`.
///
/// Every section is optional; missing sections and fields use defaults.
///
/// ```toml
/// [rpc]
/// base_url = "https://rpc.qubic.org"
/// timeout_secs = 30
///
/// [protocol]
/// unlock_input_type = 2
/// expiry_tick_offset = 9
///
/// [history]
/// max_concurrent_queries = 4
/// aggregate_epoch = "per_iteration"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QearnConfig {
    pub rpc: RpcConfig,
    pub protocol: ProtocolConstants,
    pub history: HistoryConfig,
}

impl QearnConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| QearnError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| QearnError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}
