//! Resolver ABI surface understood by the gateway

use alloy_sol_types::sol;

sol! {
    /// ENSIP-10 wildcard entry point; its calldata is what clients forward
    function resolve(bytes name, bytes data) external view returns (bytes result, uint64 expires, bytes sig);

    /// ENSIP-9 multichain address
    function addr(bytes32 node, uint256 coinType) external view returns (bytes);

    /// ENSIP-5 text record
    function text(bytes32 node, string key) external view returns (string);

    /// ENSIP-7 contenthash
    function contenthash(bytes32 node) external view returns (bytes);
}
