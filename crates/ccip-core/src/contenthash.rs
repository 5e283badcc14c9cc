//! ENSIP-7 contenthash codec for content identifiers (CIDs)
//!
//! Encoded layout: `namespace (2 bytes) || CIDv1 bytes`. The encoder only
//! produces the storage-network namespace `0xe301`; the decoder additionally
//! recognizes the naming-system variant `0xe501` for diagnostics.

use std::fmt;
use std::io::Cursor;

use alloy_primitives::Bytes;
use cid::{Cid, Version};
use thiserror::Error;

/// Namespace marker for content on the storage network (ipfs-ns)
pub const IPFS_NAMESPACE: [u8; 2] = [0xe3, 0x01];

/// Namespace marker for the naming-system variant (ipns-ns)
pub const IPNS_NAMESPACE: [u8; 2] = [0xe5, 0x01];

#[derive(Error, Debug)]
pub enum ContentHashError {
    #[error("empty content identifier")]
    Empty,

    #[error("invalid content identifier \"{input}\": {source}")]
    InvalidCid {
        input: String,
        #[source]
        source: cid::Error,
    },

    #[error("\"{input}\" looks like a {expected:?} identifier but parsed as {actual:?}")]
    VersionMismatch {
        input: String,
        expected: Version,
        actual: Version,
    },

    #[error("contenthash shorter than its namespace prefix")]
    Truncated,

    #[error("unknown contenthash namespace 0x{0}")]
    UnknownNamespace(String),

    #[error("{0} trailing bytes after the content identifier")]
    TrailingBytes(usize),
}

/// Multibase/version family of a CID string, judged by its leading characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CidFormat {
    /// `Qm...`: legacy base58btc CIDv0
    Base58V0,
    /// `baf...` (`bafy` dag-pb, `bafk` raw): base32-lower CIDv1
    Base32V1,
    /// Anything else; left to the generic multibase parser
    Other,
}

pub fn classify(input: &str) -> CidFormat {
    if input.starts_with("Qm") {
        CidFormat::Base58V0
    } else if input.starts_with("baf") {
        CidFormat::Base32V1
    } else {
        CidFormat::Other
    }
}

/// Parse a CID string and return it as CIDv1
///
/// CIDv0 inputs are upgraded; the multihash is carried over unchanged.
pub fn parse_cid(input: &str) -> Result<Cid, ContentHashError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix("ipfs://").unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(ContentHashError::Empty);
    }

    let invalid = |source| ContentHashError::InvalidCid {
        input: trimmed.to_string(),
        source,
    };
    let cid = Cid::try_from(trimmed).map_err(invalid)?;

    let expected = match classify(trimmed) {
        CidFormat::Base58V0 => Some(Version::V0),
        CidFormat::Base32V1 => Some(Version::V1),
        CidFormat::Other => None,
    };
    if let Some(expected) = expected {
        if cid.version() != expected {
            return Err(ContentHashError::VersionMismatch {
                input: trimmed.to_string(),
                expected,
                actual: cid.version(),
            });
        }
    }

    match cid.version() {
        Version::V0 => cid.into_v1().map_err(invalid),
        Version::V1 => Ok(cid),
    }
}

/// Encode a CID string as a contenthash value
pub fn encode_contenthash(input: &str) -> Result<Vec<u8>, ContentHashError> {
    let cid = parse_cid(input)?;
    let mut out = IPFS_NAMESPACE.to_vec();
    out.extend_from_slice(&cid.to_bytes());
    Ok(out)
}

/// Encode a CID string, yielding an empty value when it cannot be parsed
pub fn encode_or_empty(input: &str) -> Bytes {
    match encode_contenthash(input) {
        Ok(encoded) => encoded.into(),
        Err(e) => {
            tracing::debug!(error = %e, "Untranslatable content identifier, answering empty");
            Bytes::new()
        }
    }
}

/// Contenthash namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Ipfs,
    Ipns,
}

impl Namespace {
    pub fn prefix(&self) -> [u8; 2] {
        match self {
            Namespace::Ipfs => IPFS_NAMESPACE,
            Namespace::Ipns => IPNS_NAMESPACE,
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            Namespace::Ipfs => "ipfs",
            Namespace::Ipns => "ipns",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-ns", self.scheme())
    }
}

/// A decoded contenthash value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContentHash {
    pub namespace: Namespace,
    pub cid: Cid,
}

impl DecodedContentHash {
    /// `ipfs://<cid>` or `ipns://<cid>`
    pub fn uri(&self) -> String {
        format!("{}://{}", self.namespace.scheme(), self.cid)
    }
}

/// Decode a contenthash value into its namespace and CID
pub fn decode_contenthash(bytes: &[u8]) -> Result<DecodedContentHash, ContentHashError> {
    if bytes.len() < 2 {
        return Err(ContentHashError::Truncated);
    }
    let (prefix, cid_bytes) = bytes.split_at(2);

    let namespace = if prefix == IPFS_NAMESPACE {
        Namespace::Ipfs
    } else if prefix == IPNS_NAMESPACE {
        Namespace::Ipns
    } else {
        return Err(ContentHashError::UnknownNamespace(alloy_primitives::hex::encode(prefix)));
    };

    let mut cursor = Cursor::new(cid_bytes);
    let cid = Cid::read_bytes(&mut cursor).map_err(|source| ContentHashError::InvalidCid {
        input: alloy_primitives::hex::encode(cid_bytes),
        source,
    })?;

    let consumed = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
    if consumed < cid_bytes.len() {
        return Err(ContentHashError::TrailingBytes(cid_bytes.len() - consumed));
    }

    Ok(DecodedContentHash { namespace, cid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;
    use cid::multihash::Multihash;

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
    const CID_V1: &str = "bafybeie5nqv6kd3qnfjupgvz34woh3oksc3iau6abmyajn7qvtf6d2ho34";
    const DIGEST: &str = "9d6c2be50f706953479ab9df2ce3edca90b68053c00b3004b7f0accbe1e8eedf";

    const DAG_PB: u64 = 0x70;
    const RAW: u64 = 0x55;
    const SHA2_256: u64 = 0x12;

    #[test]
    fn test_classify() {
        assert_eq!(classify(CID_V0), CidFormat::Base58V0);
        assert_eq!(classify(CID_V1), CidFormat::Base32V1);
        assert_eq!(classify("bafkreigh2akiscaildc"), CidFormat::Base32V1);
        assert_eq!(classify("zdj7WhuEjrB52m1BisYCtmjH1hSKa7yZ3jEZ9JcXaFRD51wVz"), CidFormat::Other);
        assert_eq!(classify(""), CidFormat::Other);
    }

    #[test]
    fn test_upgrade_keeps_digest() {
        let direct = Cid::try_from(CID_V0).unwrap();
        assert_eq!(direct.version(), Version::V0);

        let upgraded = parse_cid(CID_V0).unwrap();
        assert_eq!(upgraded.version(), Version::V1);
        assert_eq!(upgraded.codec(), DAG_PB);
        assert_eq!(upgraded.hash().digest(), direct.hash().digest());
        assert_eq!(hex::encode(upgraded.hash().digest()), DIGEST);
        assert_eq!(upgraded.to_string(), CID_V1);
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode_contenthash(CID_V0).unwrap();
        assert_eq!(hex::encode(&encoded), format!("e30101701220{}", DIGEST));
        assert_eq!(encoded.len(), 2 + 4 + 32);

        // v0 and its v1 form encode identically
        assert_eq!(encode_contenthash(CID_V1).unwrap(), encoded);
        assert_eq!(encode_contenthash(&format!("ipfs://{}", CID_V1)).unwrap(), encoded);
    }

    #[test]
    fn test_raw_codec_v1() {
        let digest = hex::decode(DIGEST).unwrap();
        let cid = Cid::new_v1(RAW, Multihash::<64>::wrap(SHA2_256, &digest).unwrap());
        let text = cid.to_string();
        assert!(text.starts_with("bafk"));
        assert_eq!(classify(&text), CidFormat::Base32V1);

        let encoded = encode_contenthash(&text).unwrap();
        assert_eq!(hex::encode(&encoded), format!("e30101551220{}", DIGEST));
    }

    #[test]
    fn test_generic_multibase_is_upgraded() {
        // base58btc-multibase CIDv1 of the same content
        let v1 = parse_cid(CID_V1).unwrap();
        let base58 = v1.to_string_of_base(cid::multibase::Base::Base58Btc).unwrap();
        assert_eq!(classify(&base58), CidFormat::Other);
        assert_eq!(parse_cid(&base58).unwrap(), v1);
    }

    #[test]
    fn test_invalid_inputs_yield_empty() {
        for input in ["", "   ", "not-a-cid", "Qm123", "0xdeadbeef", "bafyNOTBASE32!"] {
            assert!(encode_contenthash(input).is_err(), "{input} should not parse");
            assert!(encode_or_empty(input).is_empty());
        }
    }

    #[test]
    fn test_decode_round_trip() {
        let encoded = encode_contenthash(CID_V0).unwrap();
        let decoded = decode_contenthash(&encoded).unwrap();
        assert_eq!(decoded.namespace, Namespace::Ipfs);
        assert_eq!(decoded.cid.to_string(), CID_V1);
        assert_eq!(decoded.uri(), format!("ipfs://{}", CID_V1));
    }

    #[test]
    fn test_decode_ipns_namespace() {
        let mut bytes = IPNS_NAMESPACE.to_vec();
        bytes.extend_from_slice(&parse_cid(CID_V1).unwrap().to_bytes());
        let decoded = decode_contenthash(&bytes).unwrap();
        assert_eq!(decoded.namespace, Namespace::Ipns);
        assert_eq!(decoded.namespace.to_string(), "ipns-ns");
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_contenthash(CID_V0).unwrap();
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(
            decode_contenthash(&bytes),
            Err(ContentHashError::TrailingBytes(4))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_prefix() {
        assert!(matches!(decode_contenthash(&[0xe3]), Err(ContentHashError::Truncated)));
        assert!(matches!(
            decode_contenthash(&[0xe4, 0x01, 0x01]),
            Err(ContentHashError::UnknownNamespace(_))
        ));
        assert!(matches!(
            decode_contenthash(&[0xe3, 0x01, 0xff]),
            Err(ContentHashError::InvalidCid { .. })
        ));
    }
}
