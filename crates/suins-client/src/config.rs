use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";

/// Registry table holding every SuiNS name record on mainnet
pub const DEFAULT_REGISTRY_TABLE_ID: &str =
    "0xe64cd9db9f829c6cc405d9790bd71567ae07259855f4fba6f02c84f52298c106";

/// Move type tag of the registry key
pub const DEFAULT_DOMAIN_TYPE: &str =
    "0xd22b24490e0bae52676651b4f56660a5ff8022a2576e0089f79b3c88d44e08f0::domain::Domain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuinsConfig {
    /// Sui fullnode JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_registry_table_id")]
    pub registry_table_id: String,
    #[serde(default = "default_domain_type")]
    pub domain_type: String,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.into()
}

fn default_registry_table_id() -> String {
    DEFAULT_REGISTRY_TABLE_ID.into()
}

fn default_domain_type() -> String {
    DEFAULT_DOMAIN_TYPE.into()
}

impl Default for SuinsConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            registry_table_id: default_registry_table_id(),
            domain_type: default_domain_type(),
        }
    }
}

impl SuinsConfig {
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
