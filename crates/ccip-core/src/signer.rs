//! Signed responses for the off-chain resolver
//!
//! The resolver contract recomputes
//! `keccak256(0x1900 || target || expires || keccak256(request) || keccak256(result))`
//! and recovers the signer from `sig`; the recovered address must be on its
//! signer allow-list and `expires` must not have passed.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy_primitives::{hex, keccak256, Address, Bytes, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolValue;

use crate::error::Error;
use crate::Result;

/// EIP-191 version 0x00 ("data with intended validator") prefix
pub const SIGNATURE_PREFIX: [u8; 2] = [0x19, 0x00];

/// Digest the resolver contract verifies
pub fn signature_hash(target: Address, expires: u64, request: &[u8], result: &[u8]) -> B256 {
    let mut message = Vec::with_capacity(2 + 20 + 8 + 32 + 32);
    message.extend_from_slice(&SIGNATURE_PREFIX);
    message.extend_from_slice(target.as_slice());
    message.extend_from_slice(&expires.to_be_bytes());
    message.extend_from_slice(keccak256(request).as_slice());
    message.extend_from_slice(keccak256(result).as_slice());
    keccak256(&message)
}

/// Response returned to the client: `(bytes result, uint64 expires, bytes sig)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedResponse {
    pub result: Bytes,
    pub expires: u64,
    /// `r || s || v`, 65 bytes
    pub signature: Bytes,
}

impl SignedResponse {
    pub fn abi_encode(&self) -> Vec<u8> {
        (self.result.clone(), self.expires, self.signature.clone()).abi_encode_params()
    }

    pub fn abi_decode(data: &[u8]) -> Result<Self> {
        let (result, expires, signature) = <(Bytes, u64, Bytes)>::abi_decode_params(data)
            .map_err(|e| Error::Decode(format!("signed response: {}", e)))?;
        Ok(Self {
            result,
            expires,
            signature,
        })
    }

    /// Recover the address that signed this response for `target` and `request`
    pub fn recover_signer(&self, target: Address, request: &[u8]) -> Result<Address> {
        let signature = Signature::try_from(self.signature.as_ref())
            .map_err(|e| Error::Decode(format!("signature: {}", e)))?;
        let hash = signature_hash(target, self.expires, request, &self.result);
        signature
            .recover_address_from_prehash(&hash)
            .map_err(|e| Error::Decode(format!("signature recovery: {}", e)))
    }
}

/// Signs resolver results with the gateway key
#[derive(Clone)]
pub struct ResponseSigner {
    signer: PrivateKeySigner,
    ttl: Duration,
}

impl std::fmt::Debug for ResponseSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSigner")
            .field("address", &self.signer.address())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ResponseSigner {
    pub fn new(signer: PrivateKeySigner, ttl: Duration) -> Self {
        Self { signer, ttl }
    }

    /// Build a signer from a 32-byte hex private key (with or without `0x`)
    pub fn from_hex(private_key: &str, ttl: Duration) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let key_bytes: [u8; 32] = hex::decode(key)
            .map_err(|e| Error::InvalidKey(format!("not hex: {}", e)))?
            .try_into()
            .map_err(|_| Error::InvalidKey("expected 32 bytes".into()))?;

        let signer = PrivateKeySigner::from_bytes(&B256::from(key_bytes))
            .map_err(|e| Error::InvalidKey(e.to_string()))?;
        Ok(Self::new(signer, ttl))
    }

    /// Address the resolver contract must list as a trusted signer
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `result` for `request`, valid until now + ttl
    pub fn sign(&self, target: Address, request: &[u8], result: &[u8]) -> Result<SignedResponse> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Signing(format!("system clock before unix epoch: {}", e)))?;
        let expires = now.as_secs().saturating_add(self.ttl.as_secs());
        self.sign_with_expiry(target, request, result, expires)
    }

    /// Sign with an explicit expiry timestamp
    pub fn sign_with_expiry(
        &self,
        target: Address,
        request: &[u8],
        result: &[u8],
        expires: u64,
    ) -> Result<SignedResponse> {
        let hash = signature_hash(target, expires, request, result);
        let signature = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| Error::Signing(e.to_string()))?;

        Ok(SignedResponse {
            result: Bytes::copy_from_slice(result),
            expires,
            signature: Bytes::copy_from_slice(&signature.as_bytes()),
        })
    }
}
