//! Request decoding: wire bytes -> target name + typed resolver query

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::abi::{addrCall, contenthashCall, resolveCall, textCall};
use crate::dns;
use crate::error::Error;
use crate::namehash::namehash;
use crate::Result;

/// One incoming off-chain lookup: the contract that raised `OffchainLookup`
/// and the opaque calldata it asked the gateway to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffchainRequest {
    pub sender: Address,
    pub data: Bytes,
}

impl OffchainRequest {
    pub fn new(sender: Address, data: impl Into<Bytes>) -> Self {
        Self {
            sender,
            data: data.into(),
        }
    }

    /// Parse the hex-encoded `sender` and `data` fields of a gateway call
    pub fn parse(sender: &str, data: &str) -> Result<Self> {
        let sender = Address::from_str(sender.trim())
            .map_err(|e| Error::InvalidSender(format!("{}: {}", sender, e)))?;

        let data = data.trim();
        let hex_body = data
            .strip_prefix("0x")
            .ok_or_else(|| Error::Decode("request data must be 0x-prefixed hex".into()))?;
        let data = hex::decode(hex_body)
            .map_err(|e| Error::Decode(format!("request data is not hex: {}", e)))?;

        Ok(Self::new(sender, data))
    }
}

/// Resolver function requested by the inner call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverQuery {
    /// `addr(bytes32,uint256)`
    Addr { node: B256, coin_type: U256 },
    /// `text(bytes32,string)`
    Text { node: B256, key: String },
    /// `contenthash(bytes32)`
    ContentHash { node: B256 },
    /// Any other selector, or a known selector whose arguments do not decode
    Unsupported { selector: Option<[u8; 4]> },
}

impl ResolverQuery {
    /// Short function name used in logs and metrics labels
    pub fn function_name(&self) -> &'static str {
        match self {
            ResolverQuery::Addr { .. } => "addr",
            ResolverQuery::Text { .. } => "text",
            ResolverQuery::ContentHash { .. } => "contenthash",
            ResolverQuery::Unsupported { .. } => "unsupported",
        }
    }

    /// Node argument carried by the call, if it decoded
    pub fn node(&self) -> Option<B256> {
        match self {
            ResolverQuery::Addr { node, .. }
            | ResolverQuery::Text { node, .. }
            | ResolverQuery::ContentHash { node } => Some(*node),
            ResolverQuery::Unsupported { .. } => None,
        }
    }
}

impl fmt::Display for ResolverQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverQuery::Addr { coin_type, .. } => write!(f, "addr({})", coin_type),
            ResolverQuery::Text { key, .. } => write!(f, "text({:?})", key),
            ResolverQuery::ContentHash { .. } => write!(f, "contenthash()"),
            ResolverQuery::Unsupported {
                selector: Some(selector),
            } => write!(f, "0x{}", hex::encode(selector)),
            ResolverQuery::Unsupported { selector: None } => write!(f, "<empty call>"),
        }
    }
}

/// A fully decoded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedQuery {
    /// Dot-joined target name, as carried by the DNS-encoded name
    pub name: String,
    /// Name-hash of `name`
    pub node: B256,
    pub query: ResolverQuery,
}

/// Decode `requestData` into a query
///
/// Accepts either full `resolve(bytes,bytes)` calldata or the bare
/// `(bytes,bytes)` tuple. Structural corruption of the outer tuple or of the
/// DNS name is an error; an inner call that matches no known signature is
/// returned as [`ResolverQuery::Unsupported`].
pub fn decode_request(data: &[u8]) -> Result<DecodedQuery> {
    let (encoded_name, call) = decode_outer(data)?;
    let name = dns::decode_name(&encoded_name)?;
    let node = namehash(&name);
    let query = decode_call(&call);

    if let Some(inner) = query.node() {
        if inner != node {
            return Err(Error::NodeMismatch {
                name,
                expected: node.to_string(),
                actual: inner.to_string(),
            });
        }
    }

    Ok(DecodedQuery { name, node, query })
}

fn decode_outer(data: &[u8]) -> Result<(Bytes, Bytes)> {
    if data.starts_with(&resolveCall::SELECTOR) {
        let call = resolveCall::abi_decode(data)
            .map_err(|e| Error::Decode(format!("resolve(bytes,bytes) calldata: {}", e)))?;
        return Ok((call.name, call.data));
    }

    <(Bytes, Bytes)>::abi_decode_params(data)
        .map_err(|e| Error::Decode(format!("(bytes,bytes) tuple: {}", e)))
}

fn decode_call(data: &[u8]) -> ResolverQuery {
    let selector: Option<[u8; 4]> = data.get(..4).and_then(|s| s.try_into().ok());
    let Some(selector) = selector else {
        return ResolverQuery::Unsupported { selector: None };
    };

    let decoded = if selector == addrCall::SELECTOR {
        addrCall::abi_decode(data).map(|call| ResolverQuery::Addr {
            node: call.node,
            coin_type: call.coinType,
        })
    } else if selector == textCall::SELECTOR {
        textCall::abi_decode(data).map(|call| ResolverQuery::Text {
            node: call.node,
            key: call.key,
        })
    } else if selector == contenthashCall::SELECTOR {
        contenthashCall::abi_decode(data).map(|call| ResolverQuery::ContentHash { node: call.node })
    } else {
        return ResolverQuery::Unsupported {
            selector: Some(selector),
        };
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(
            selector = %hex::encode(selector),
            error = %e,
            "Inner call arguments do not decode"
        );
        ResolverQuery::Unsupported {
            selector: Some(selector),
        }
    })
}
