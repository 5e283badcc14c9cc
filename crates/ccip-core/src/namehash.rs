//! ENS name-hash (EIP-137)

use alloy_primitives::{keccak256, B256};

/// Recursive name-hash of a dot-separated name
///
/// The name is lower-cased first, so `Alice.eth` and `alice.eth` share a node.
/// The empty name hashes to the zero node.
pub fn namehash(name: &str) -> B256 {
    let name = name.to_lowercase();
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }

    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}
