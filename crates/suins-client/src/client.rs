//! Name-record provider backed by a Sui fullnode
//!
//! SuiNS keeps every registered name as a dynamic field of one registry
//! table, keyed by `Domain { labels }` with the labels in reverse order
//! (`bob.sui` -> `["sui", "bob"]`).

use std::str::FromStr;

use alloy_primitives::B256;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use async_trait::async_trait;
use ccip_core::{LookupOutcome, NameRecord, NameRecordProvider};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SuinsConfig;

/// Keys of the record's data map
pub mod data_keys {
    pub const AVATAR: &str = "avatar";
    pub const CONTENT_HASH: &str = "content_hash";
    pub const WALRUS_SITE_ID: &str = "walrus_site_id";
}

/// Object errors that mean the name is simply not registered
const MISSING_FIELD_CODES: [&str; 3] = ["dynamicFieldNotFound", "notExists", "deleted"];

/// Dynamic field name passed to `suix_getDynamicFieldObject`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicFieldName {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: DomainKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainKey {
    pub labels: Vec<String>,
}

impl DomainKey {
    /// Registry key for `name`, or `None` when it has an empty label
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        let mut labels: Vec<String> = name.split('.').map(str::to_string).collect();
        if labels.iter().any(|l| l.is_empty()) {
            return None;
        }
        labels.reverse();
        Some(Self { labels })
    }
}

/// Response from suix_getDynamicFieldObject
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicFieldResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<ObjectError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectError {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectData {
    #[serde(rename = "objectId", default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub content: Option<MoveStruct<FieldFields>>,
}

/// `{ "type": ..., "fields": T }` wrapper used for every Move struct
#[derive(Debug, Clone, Deserialize)]
pub struct MoveStruct<T> {
    pub fields: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldFields {
    pub value: MoveStruct<NameRecordFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRecordFields {
    #[serde(default)]
    pub target_address: Option<String>,
    #[serde(default)]
    pub data: Option<MoveStruct<VecMapFields>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VecMapFields {
    #[serde(default)]
    pub contents: Vec<MoveStruct<VecMapEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VecMapEntry {
    pub key: String,
    pub value: String,
}

/// Left-pad a Sui address (`0x` + up to 64 hex digits) to 32 bytes
pub fn parse_sui_address(address: &str) -> anyhow::Result<B256> {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    anyhow::ensure!(
        !digits.is_empty() && digits.len() <= 64,
        "invalid Sui address length: {}",
        address
    );
    Ok(B256::from_str(&format!("{:0>64}", digits))?)
}

/// Extract the name record from a dynamic field response
///
/// `Ok(None)` when the registry has no entry for the name.
pub fn parse_name_record(response: DynamicFieldResponse) -> anyhow::Result<Option<NameRecord>> {
    if let Some(error) = response.error {
        if MISSING_FIELD_CODES.contains(&error.code.as_str()) {
            return Ok(None);
        }
        anyhow::bail!("object error: {}", error.code);
    }

    let Some(content) = response.data.and_then(|d| d.content) else {
        return Ok(None);
    };
    let fields = content.fields.value.fields;

    let mut record = NameRecord {
        target_address: fields
            .target_address
            .as_deref()
            .map(parse_sui_address)
            .transpose()?,
        ..Default::default()
    };

    let entries = fields.data.map(|d| d.fields.contents).unwrap_or_default();
    for entry in entries {
        let VecMapEntry { key, value } = entry.fields;
        match key.as_str() {
            data_keys::AVATAR => record.avatar = Some(value),
            data_keys::CONTENT_HASH => record.content_hash = Some(value),
            data_keys::WALRUS_SITE_ID => record.walrus_site_id = Some(value),
            _ => {}
        }
    }

    Ok(Some(record))
}

/// SuiNS registry client
pub struct SuinsClient {
    rpc: RpcClient,
    config: SuinsConfig,
}

impl SuinsClient {
    pub async fn new(config: SuinsConfig) -> anyhow::Result<Self> {
        let rpc = ClientBuilder::default().connect(&config.rpc_url).await?;
        Ok(Self { rpc, config })
    }

    pub fn config(&self) -> &SuinsConfig {
        &self.config
    }

    async fn rpc_call<Params, Resp>(&self, method: &str, params: Params) -> anyhow::Result<Resp>
    where
        Params: Serialize + Clone + std::fmt::Debug + Send + Sync + Unpin + 'static,
        Resp: DeserializeOwned + std::fmt::Debug + Send + Sync + Unpin + 'static,
    {
        Ok(self.rpc.request(method.to_string(), params).await?)
    }

    /// Fetch the registry entry for a native name such as `bob.sui`
    pub async fn get_name_record(&self, name: &str) -> anyhow::Result<Option<NameRecord>> {
        let Some(key) = DomainKey::from_name(name) else {
            debug!(name, "Name has an empty label, not querying registry");
            return Ok(None);
        };

        let field = DynamicFieldName {
            type_tag: self.config.domain_type.clone(),
            value: key,
        };
        let response: DynamicFieldResponse = self
            .rpc_call(
                "suix_getDynamicFieldObject",
                (self.config.registry_table_id.clone(), field),
            )
            .await?;

        parse_name_record(response)
    }
}

#[async_trait]
impl NameRecordProvider for SuinsClient {
    async fn lookup(&self, name: &str) -> LookupOutcome {
        match self.get_name_record(name).await {
            Ok(Some(record)) => LookupOutcome::Found(record),
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => {
                warn!(name, error = %e, "SuiNS lookup failed");
                LookupOutcome::ProviderError(format!("{:#}", e))
            }
        }
    }
}
