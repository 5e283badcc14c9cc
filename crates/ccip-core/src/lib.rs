//! ccip-core: Off-chain read (EIP-3668) gateway core for ENS names backed by SuiNS
//!
//! An ENS resolver contract for a parent domain (e.g. `onsui.eth`) reverts
//! with `OffchainLookup`; the client forwards the revert's calldata here and
//! the gateway answers with a result the contract can verify.
//!
//! Pipeline per request:
//!
//! ```text
//! requestData --decode--> DecodedQuery --resolve--> ResolvedValue --sign--> SignedResponse
//!                                         |
//!                                  NameRecordProvider (bob.onsui.eth -> bob.sui)
//! ```
//!
//! # Trust Model
//!
//! | Party | Trusted for |
//! |-------|-------------|
//! | Resolver contract | Verifying the signature, expiry and signer allow-list |
//! | Gateway signer key | Everything it signs; a leaked key forges any record |
//! | Name-record provider | Record contents; failures degrade to empty answers |
//!
//! The signature binds `(sender, expires, requestData, result)`, so a response
//! cannot be replayed for another request, another contract, or after expiry.

pub mod abi;
mod config;
pub mod contenthash;
pub mod dns;
mod error;
mod gateway;
mod namehash;
mod record;
mod request;
mod resolver;
mod signer;

pub use config::{GatewayConfig, DEFAULT_PARENT_DOMAIN, DEFAULT_TTL_SECS, SUI_COIN_TYPE};
pub use contenthash::{ContentHashError, DecodedContentHash, Namespace};
pub use error::Error;
pub use gateway::OffchainGateway;
pub use namehash::namehash;
pub use record::{LookupOutcome, NameRecord, NameRecordProvider, StaticProvider};
pub use request::{decode_request, DecodedQuery, OffchainRequest, ResolverQuery};
pub use resolver::{text_keys, QueryResolver, ResolvedValue};
pub use signer::{signature_hash, ResponseSigner, SignedResponse, SIGNATURE_PREFIX};

pub type Result<T> = std::result::Result<T, Error>;
