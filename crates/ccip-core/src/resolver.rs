//! Query resolution against the foreign naming service

use std::sync::Arc;

use alloy_primitives::{hex, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use cid::Version;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::contenthash::{self, Namespace};
use crate::error::Error;
use crate::record::{LookupOutcome, NameRecord, NameRecordProvider};
use crate::request::{DecodedQuery, ResolverQuery};
use crate::Result;

/// Text record keys served from the name record
pub mod text_keys {
    pub const AVATAR: &str = "avatar";
    pub const CONTENT_HASH: &str = "contentHash";
    pub const WALRUS_SITE_ID: &str = "walrusSiteId";
    /// Reverse-mapping convenience: the name on the foreign ledger
    pub const NATIVE_NAME: &str = "org.suins.name";
}

/// Value answered for a query, before ABI encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// `addr` result: raw address bytes
    Address(Bytes),
    Text(String),
    /// `contenthash` result: namespace-tagged bytes, or empty
    ContentHash(Bytes),
}

impl ResolvedValue {
    /// ABI return encoding of the resolver function that produced this value
    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            ResolvedValue::Address(bytes) | ResolvedValue::ContentHash(bytes) => bytes.abi_encode(),
            ResolvedValue::Text(text) => text.abi_encode(),
        }
    }
}

/// Maps decoded queries to values using a [`NameRecordProvider`]
pub struct QueryResolver {
    provider: Arc<dyn NameRecordProvider>,
    parent_domain: String,
    native_suffix: String,
    coin_type: U256,
}

impl QueryResolver {
    pub fn new(config: &GatewayConfig, provider: Arc<dyn NameRecordProvider>) -> Self {
        Self {
            provider,
            parent_domain: config.parent_domain.to_lowercase(),
            native_suffix: config.native_suffix.clone(),
            coin_type: U256::from(config.coin_type),
        }
    }

    /// Translate `bob.onsui.eth` into the provider's `bob.sui`
    pub fn native_name(&self, name: &str) -> Result<String> {
        let name = name.to_lowercase();
        let suffix = format!(".{}", self.parent_domain);
        match name.strip_suffix(&suffix) {
            Some(subname) if !subname.is_empty() => Ok(format!("{}.{}", subname, self.native_suffix)),
            _ => Err(Error::DomainMismatch {
                name,
                parent: self.parent_domain.clone(),
            }),
        }
    }

    /// Resolve a query; a missing or unreachable record yields zero/empty values
    pub async fn resolve(&self, query: &DecodedQuery) -> Result<ResolvedValue> {
        let native_name = self.native_name(&query.name)?;
        let record = match query.query {
            ResolverQuery::Unsupported { .. } => None,
            _ => self.fetch(&native_name).await,
        };
        self.apply(query, record.as_ref())
    }

    async fn fetch(&self, native_name: &str) -> Option<NameRecord> {
        let outcome = self.provider.lookup(native_name).await;
        match &outcome {
            LookupOutcome::Found(_) => debug!(name = native_name, "Record found"),
            LookupOutcome::NotFound => debug!(name = native_name, "No record"),
            LookupOutcome::ProviderError(e) => {
                warn!(name = native_name, error = %e, "Provider lookup failed, answering as absent")
            }
        }
        outcome.into_record()
    }

    /// Resolution policy for a query given the (possibly absent) record
    pub fn apply(&self, query: &DecodedQuery, record: Option<&NameRecord>) -> Result<ResolvedValue> {
        match &query.query {
            ResolverQuery::Addr { coin_type, .. } => {
                let address = record
                    .filter(|_| *coin_type == self.coin_type)
                    .and_then(|r| r.target_address)
                    .unwrap_or(B256::ZERO);
                Ok(ResolvedValue::Address(Bytes::copy_from_slice(address.as_slice())))
            }
            ResolverQuery::Text { key, .. } => {
                let text = record
                    .map(|r| self.text_record(&query.name, r, key))
                    .unwrap_or_default();
                Ok(ResolvedValue::Text(text))
            }
            ResolverQuery::ContentHash { .. } => {
                let value = record
                    .and_then(|r| r.content_hash.as_deref())
                    .map(contenthash_value)
                    .unwrap_or_default();
                Ok(ResolvedValue::ContentHash(value))
            }
            ResolverQuery::Unsupported { .. } => {
                Err(Error::UnsupportedQuery(query.query.to_string()))
            }
        }
    }

    fn text_record(&self, name: &str, record: &NameRecord, key: &str) -> String {
        let field = match key {
            text_keys::AVATAR => &record.avatar,
            text_keys::CONTENT_HASH => &record.content_hash,
            text_keys::WALRUS_SITE_ID => &record.walrus_site_id,
            text_keys::NATIVE_NAME => {
                let label = name.split('.').next().unwrap_or_default().to_lowercase();
                return format!("{}.{}", label, self.native_suffix);
            }
            _ => return String::new(),
        };
        field.clone().unwrap_or_default()
    }
}

/// Contenthash for a stored value: pre-encoded hex passes through, CIDs are translated
///
/// Only a complete `0xe301` + CIDv1 value is passed through; any other `0x`
/// string answers empty.
fn contenthash_value(raw: &str) -> Bytes {
    let Some(body) = raw.strip_prefix("0x") else {
        return contenthash::encode_or_empty(raw);
    };

    let bytes = match hex::decode(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Stored contenthash is not hex, answering empty");
            return Bytes::new();
        }
    };
    match contenthash::decode_contenthash(&bytes) {
        Ok(decoded)
            if decoded.namespace == Namespace::Ipfs && decoded.cid.version() == Version::V1 =>
        {
            bytes.into()
        }
        Ok(decoded) => {
            debug!(namespace = %decoded.namespace, "Stored contenthash is not servable, answering empty");
            Bytes::new()
        }
        Err(e) => {
            debug!(error = %e, "Stored contenthash does not decode, answering empty");
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namehash::namehash;
    use crate::record::StaticProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    struct CountingProvider {
        outcome: LookupOutcome,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NameRecordProvider for CountingProvider {
        async fn lookup(&self, _name: &str) -> LookupOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn bob_record() -> NameRecord {
        NameRecord {
            target_address: Some(B256::repeat_byte(0xaa)),
            avatar: Some("https://example.com/bob.png".into()),
            content_hash: Some(CID_V0.into()),
            walrus_site_id: Some("0xwalrus".into()),
        }
    }

    fn resolver_with(provider: StaticProvider) -> QueryResolver {
        QueryResolver::new(&GatewayConfig::default(), Arc::new(provider))
    }

    fn query(name: &str, query: ResolverQuery) -> DecodedQuery {
        DecodedQuery {
            name: name.into(),
            node: namehash(name),
            query,
        }
    }

    fn addr(name: &str, coin_type: u64) -> DecodedQuery {
        query(
            name,
            ResolverQuery::Addr {
                node: namehash(name),
                coin_type: U256::from(coin_type),
            },
        )
    }

    fn text(name: &str, key: &str) -> DecodedQuery {
        query(
            name,
            ResolverQuery::Text {
                node: namehash(name),
                key: key.into(),
            },
        )
    }

    fn contenthash(name: &str) -> DecodedQuery {
        query(name, ResolverQuery::ContentHash { node: namehash(name) })
    }

    #[test]
    fn test_native_name_mapping() {
        let resolver = resolver_with(StaticProvider::new());
        assert_eq!(resolver.native_name("bob.onsui.eth").unwrap(), "bob.sui");
        assert_eq!(resolver.native_name("Bob.OnSui.ETH").unwrap(), "bob.sui");
        assert_eq!(resolver.native_name("app.bob.onsui.eth").unwrap(), "app.bob.sui");
        assert!(matches!(
            resolver.native_name("onsui.eth"),
            Err(Error::DomainMismatch { .. })
        ));
        assert!(matches!(
            resolver.native_name("bob.other.eth"),
            Err(Error::DomainMismatch { .. })
        ));
        assert!(resolver.native_name("bobonsui.eth").is_err());
    }

    #[tokio::test]
    async fn test_found_record() {
        let resolver = resolver_with(StaticProvider::new().with_record("bob.sui", bob_record()));

        let value = resolver.resolve(&addr("bob.onsui.eth", 784)).await.unwrap();
        assert_eq!(value, ResolvedValue::Address(Bytes::from(vec![0xaa; 32])));

        let value = resolver.resolve(&text("bob.onsui.eth", "avatar")).await.unwrap();
        assert_eq!(value, ResolvedValue::Text("https://example.com/bob.png".into()));

        let value = resolver.resolve(&text("bob.onsui.eth", "contentHash")).await.unwrap();
        assert_eq!(value, ResolvedValue::Text(CID_V0.into()));

        let value = resolver.resolve(&text("bob.onsui.eth", "walrusSiteId")).await.unwrap();
        assert_eq!(value, ResolvedValue::Text("0xwalrus".into()));

        let value = resolver.resolve(&text("bob.onsui.eth", "org.suins.name")).await.unwrap();
        assert_eq!(value, ResolvedValue::Text("bob.sui".into()));

        let value = resolver.resolve(&text("bob.onsui.eth", "com.twitter")).await.unwrap();
        assert_eq!(value, ResolvedValue::Text(String::new()));

        let value = resolver.resolve(&contenthash("bob.onsui.eth")).await.unwrap();
        match value {
            ResolvedValue::ContentHash(bytes) => {
                assert_eq!(&bytes[..6], &[0xe3, 0x01, 0x01, 0x70, 0x12, 0x20]);
                assert_eq!(bytes.len(), 38);
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_coin_type_is_zero() {
        let resolver = resolver_with(StaticProvider::new().with_record("bob.sui", bob_record()));
        let value = resolver.resolve(&addr("bob.onsui.eth", 60)).await.unwrap();
        assert_eq!(value, ResolvedValue::Address(Bytes::from(vec![0u8; 32])));
    }

    #[tokio::test]
    async fn test_absent_record_defaults() {
        let resolver = resolver_with(StaticProvider::new());

        assert_eq!(
            resolver.resolve(&addr("ghost.onsui.eth", 784)).await.unwrap(),
            ResolvedValue::Address(Bytes::from(vec![0u8; 32]))
        );
        for key in ["avatar", "contentHash", "walrusSiteId", "org.suins.name", "url"] {
            assert_eq!(
                resolver.resolve(&text("ghost.onsui.eth", key)).await.unwrap(),
                ResolvedValue::Text(String::new())
            );
        }
        assert_eq!(
            resolver.resolve(&contenthash("ghost.onsui.eth")).await.unwrap(),
            ResolvedValue::ContentHash(Bytes::new())
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_absence() {
        let provider = Arc::new(CountingProvider {
            outcome: LookupOutcome::ProviderError("connection refused".into()),
            calls: AtomicUsize::new(0),
        });
        let resolver = QueryResolver::new(&GatewayConfig::default(), provider.clone());

        assert_eq!(
            resolver.resolve(&text("bob.onsui.eth", "avatar")).await.unwrap(),
            ResolvedValue::Text(String::new())
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsupported_skips_provider() {
        let provider = Arc::new(CountingProvider {
            outcome: LookupOutcome::Found(bob_record()),
            calls: AtomicUsize::new(0),
        });
        let resolver = QueryResolver::new(&GatewayConfig::default(), provider.clone());

        let unsupported = query(
            "bob.onsui.eth",
            ResolverQuery::Unsupported {
                selector: Some([0x3b, 0x3b, 0x57, 0xde]),
            },
        );
        let err = resolver.resolve(&unsupported).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedQuery(ref s) if s == "0x3b3b57de"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_domain_mismatch_surfaces() {
        let resolver = resolver_with(StaticProvider::new());
        let err = resolver.resolve(&addr("bob.other.eth", 784)).await.unwrap_err();
        assert!(matches!(err, Error::DomainMismatch { .. }));
    }

    #[tokio::test]
    async fn test_contenthash_fallbacks() {
        let pre_encoded = format!(
            "0x{}",
            hex::encode(contenthash::encode_contenthash(CID_V0).unwrap())
        );
        let resolver = resolver_with(
            StaticProvider::new()
                .with_record(
                    "broken.sui",
                    NameRecord {
                        content_hash: Some("definitely not a cid".into()),
                        ..Default::default()
                    },
                )
                .with_record(
                    "encoded.sui",
                    NameRecord {
                        content_hash: Some(pre_encoded.clone()),
                        ..Default::default()
                    },
                ),
        );

        assert_eq!(
            resolver.resolve(&contenthash("broken.onsui.eth")).await.unwrap(),
            ResolvedValue::ContentHash(Bytes::new())
        );
        let value = resolver.resolve(&contenthash("encoded.onsui.eth")).await.unwrap();
        assert_eq!(
            value,
            ResolvedValue::ContentHash(hex::decode(&pre_encoded[2..]).unwrap().into())
        );
    }

    #[tokio::test]
    async fn test_pre_encoded_contenthash_must_be_exact() {
        let encoded = contenthash::encode_contenthash(CID_V0).unwrap();
        let with_junk = format!("0x{}deadbeef", hex::encode(&encoded));
        let mut ipns = contenthash::IPNS_NAMESPACE.to_vec();
        ipns.extend_from_slice(&encoded[2..]);

        let resolver = resolver_with(
            StaticProvider::new()
                .with_record(
                    "junk.sui",
                    NameRecord {
                        content_hash: Some(with_junk),
                        ..Default::default()
                    },
                )
                .with_record(
                    "ipns.sui",
                    NameRecord {
                        content_hash: Some(format!("0x{}", hex::encode(&ipns))),
                        ..Default::default()
                    },
                )
                .with_record(
                    "odd.sui",
                    NameRecord {
                        content_hash: Some("0xe3".into()),
                        ..Default::default()
                    },
                ),
        );

        for name in ["junk.onsui.eth", "ipns.onsui.eth", "odd.onsui.eth"] {
            assert_eq!(
                resolver.resolve(&contenthash(name)).await.unwrap(),
                ResolvedValue::ContentHash(Bytes::new()),
                "{name}"
            );
        }
    }

    #[test]
    fn test_result_abi_encoding() {
        let encoded = ResolvedValue::Address(Bytes::from(vec![0xaa; 32])).abi_encode();
        assert_eq!(
            hex::encode(&encoded),
            format!("{:064x}{:064x}{}", 0x20, 0x20, "aa".repeat(32))
        );

        let encoded = ResolvedValue::Text("bob.sui".into()).abi_encode();
        assert_eq!(encoded.len(), 96);
        assert_eq!(&encoded[64..71], b"bob.sui");

        let encoded = ResolvedValue::ContentHash(Bytes::new()).abi_encode();
        assert_eq!(hex::encode(&encoded), format!("{:064x}{:064x}", 0x20, 0));
    }
}
