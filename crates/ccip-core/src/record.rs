//! Name records and the provider seam

use std::collections::HashMap;
use std::path::Path;

use alloy_primitives::B256;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record held by the foreign naming service for one name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    /// 32-byte address the name points at
    #[serde(default)]
    pub target_address: Option<B256>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Raw content identifier string as stored by the provider
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub walrus_site_id: Option<String>,
}

/// Result of a provider lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(NameRecord),
    NotFound,
    /// Transport, RPC or parse failure; the record may still exist
    ProviderError(String),
}

impl LookupOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            LookupOutcome::Found(_) => "found",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::ProviderError(_) => "error",
        }
    }

    /// Collapse into the record, treating failure as absence
    pub fn into_record(self) -> Option<NameRecord> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            LookupOutcome::NotFound | LookupOutcome::ProviderError(_) => None,
        }
    }
}

/// Foreign naming service client
///
/// `name` is already in the provider's native format (e.g. `bob.sui`).
/// Implementations are shared across concurrent requests.
#[async_trait]
pub trait NameRecordProvider: Send + Sync {
    async fn lookup(&self, name: &str) -> LookupOutcome;
}

/// In-memory provider keyed by native name
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: HashMap<String, NameRecord>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, name: &str, record: NameRecord) -> Self {
        self.insert(name, record);
        self
    }

    pub fn insert(&mut self, name: &str, record: NameRecord) {
        self.records.insert(name.to_lowercase(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load a JSON object mapping native names to records
    ///
    /// ```text
    /// { "bob.sui": { "targetAddress": "0x..", "avatar": "https://.." } }
    /// ```
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let records: HashMap<String, NameRecord> = serde_json::from_str(&content)?;
        let mut provider = Self::new();
        for (name, record) in records {
            provider.insert(&name, record);
        }
        Ok(provider)
    }
}

#[async_trait]
impl NameRecordProvider for StaticProvider {
    async fn lookup(&self, name: &str) -> LookupOutcome {
        match self.records.get(&name.to_lowercase()) {
            Some(record) => LookupOutcome::Found(record.clone()),
            None => LookupOutcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let record: NameRecord = serde_json::from_str(
            r#"{
                "targetAddress": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "walrusSiteId": "0x1234"
            }"#,
        )
        .unwrap();
        assert_eq!(record.target_address, Some(B256::repeat_byte(0xaa)));
        assert_eq!(record.walrus_site_id.as_deref(), Some("0x1234"));
        assert!(record.avatar.is_none());
        assert!(record.content_hash.is_none());
    }

    #[tokio::test]
    async fn test_static_lookup_is_case_insensitive() {
        let provider = StaticProvider::new().with_record(
            "Bob.sui",
            NameRecord {
                avatar: Some("https://example.com/bob.png".into()),
                ..Default::default()
            },
        );

        match provider.lookup("bob.sui").await {
            LookupOutcome::Found(record) => {
                assert_eq!(record.avatar.as_deref(), Some("https://example.com/bob.png"))
            }
            other => panic!("expected record, got {:?}", other),
        }
        assert_eq!(provider.lookup("alice.sui").await, LookupOutcome::NotFound);
    }

    #[test]
    fn test_outcome_collapse() {
        assert_eq!(LookupOutcome::NotFound.into_record(), None);
        assert_eq!(LookupOutcome::ProviderError("timeout".into()).into_record(), None);
        assert_eq!(
            LookupOutcome::Found(NameRecord::default()).into_record(),
            Some(NameRecord::default())
        );
        assert_eq!(LookupOutcome::ProviderError("x".into()).label(), "error");
    }

    #[test]
    fn test_load_records_file() {
        let dir = std::env::temp_dir().join(format!("ccip-records-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("records.json");
        std::fs::write(&path, r#"{ "Carol.sui": { "avatar": "ipfs://carol" } }"#).unwrap();

        let provider = StaticProvider::load(&path).unwrap();
        assert_eq!(provider.len(), 1);
        assert!(provider.records.contains_key("carol.sui"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
