//! Solidity `keccak256(abi.encodePacked(...))` over typed values.
//!
//! All commitment hashes go through [`solidity_keccak256`] so that a change
//! to the packing rules applies to every hash at once. The on-chain debt
//! kernel recomputes these hashes, so the encoding must match Solidity's
//! non-standard packed mode exactly: addresses take 20 bytes, `uint256` and
//! `bytes32` take 32 bytes each, with no padding between values.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;

/// A value tagged with the Solidity type it is packed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedValue {
    Address(Address),
    Uint256(U256),
    Bytes32(B256),
}

impl PackedValue {
    /// Width of the packed encoding in bytes.
    pub fn packed_len(&self) -> usize {
        match self {
            PackedValue::Address(_) => 20,
            PackedValue::Uint256(_) | PackedValue::Bytes32(_) => 32,
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            PackedValue::Address(value) => out.extend_from_slice(&value.abi_encode_packed()),
            PackedValue::Uint256(value) => out.extend_from_slice(&value.abi_encode_packed()),
            PackedValue::Bytes32(value) => out.extend_from_slice(&value.abi_encode_packed()),
        }
    }
}

impl From<Address> for PackedValue {
    fn from(value: Address) -> Self {
        PackedValue::Address(value)
    }
}

impl From<U256> for PackedValue {
    fn from(value: U256) -> Self {
        PackedValue::Uint256(value)
    }
}

impl From<B256> for PackedValue {
    fn from(value: B256) -> Self {
        PackedValue::Bytes32(value)
    }
}

/// Concatenate the packed encodings of `values` in order.
pub fn encode_packed(values: &[PackedValue]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.iter().map(PackedValue::packed_len).sum());
    for value in values {
        value.encode_into(&mut out);
    }
    out
}

/// Equivalent of Solidity's `keccak256(abi.encodePacked(values...))`.
pub fn solidity_keccak256(values: &[PackedValue]) -> B256 {
    keccak256(encode_packed(values))
}
