//! Gateway configuration

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parent ENS domain served by default
pub const DEFAULT_PARENT_DOMAIN: &str = "onsui.eth";

/// Native suffix of the foreign naming service
pub const DEFAULT_NATIVE_SUFFIX: &str = "sui";

/// SLIP-44 coin type of the foreign chain
pub const SUI_COIN_TYPE: u64 = 784;

/// Default lifetime of a signed response
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Configuration for the off-chain read gateway
///
/// The signing key is deliberately absent: it is injected at startup
/// from the command line or the environment, never from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Parent domain whose subnames are resolved (e.g. `onsui.eth`)
    #[serde(default = "default_parent_domain")]
    pub parent_domain: String,
    /// Suffix appended to build the provider's native name (e.g. `sui`)
    #[serde(default = "default_native_suffix")]
    pub native_suffix: String,
    /// Coin type answered with the record's target address
    #[serde(default = "default_coin_type")]
    pub coin_type: u64,
    /// Seconds a signed response stays valid
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Resolver contract allowed to request signatures; any sender when unset
    #[serde(default)]
    pub resolver_address: Option<Address>,
}

fn default_parent_domain() -> String {
    DEFAULT_PARENT_DOMAIN.to_string()
}

fn default_native_suffix() -> String {
    DEFAULT_NATIVE_SUFFIX.to_string()
}

fn default_coin_type() -> u64 {
    SUI_COIN_TYPE
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

impl GatewayConfig {
    /// Create a configuration serving subnames of `parent_domain`
    pub fn new(parent_domain: impl Into<String>) -> Self {
        Self {
            parent_domain: parent_domain.into().to_lowercase(),
            ..Self::default()
        }
    }

    /// Set the response lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    /// Pin the resolver contract that signatures are produced for
    pub fn with_resolver(mut self, resolver: Address) -> Self {
        self.resolver_address = Some(resolver);
        self
    }

    /// Response lifetime as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            parent_domain: default_parent_domain(),
            native_suffix: default_native_suffix(),
            coin_type: default_coin_type(),
            ttl_secs: default_ttl_secs(),
            resolver_address: None,
        }
    }
}
