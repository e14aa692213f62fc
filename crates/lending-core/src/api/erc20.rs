//! ERC20 calldata encoding and result decoding.

use alloy_primitives::{Address, Bytes, U256};

use super::rpc::RpcError;

/// `transfer(address,uint256)` selector.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `transferFrom(address,address,uint256)` selector.
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];

/// `approve(address,uint256)` selector.
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// `balanceOf(address)` selector.
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// `allowance(address,address)` selector.
pub const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];

/// A single ABI-encoded argument.
enum Arg {
    Address(Address),
    Uint(U256),
}

fn encode_call(selector: [u8; 4], args: &[Arg]) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector);
    for arg in args {
        match arg {
            Arg::Address(address) => {
                // address left-padded to 32 bytes
                data.extend_from_slice(&[0u8; 12]);
                data.extend_from_slice(address.as_slice());
            }
            Arg::Uint(value) => data.extend_from_slice(&value.to_be_bytes::<32>()),
        }
    }
    Bytes::from(data)
}

/// Calldata for `transfer(to, value)`.
pub fn encode_transfer(to: Address, value: U256) -> Bytes {
    encode_call(TRANSFER_SELECTOR, &[Arg::Address(to), Arg::Uint(value)])
}

/// Calldata for `transferFrom(from, to, value)`.
pub fn encode_transfer_from(from: Address, to: Address, value: U256) -> Bytes {
    encode_call(
        TRANSFER_FROM_SELECTOR,
        &[Arg::Address(from), Arg::Address(to), Arg::Uint(value)],
    )
}

/// Calldata for `approve(spender, value)`.
pub fn encode_approve(spender: Address, value: U256) -> Bytes {
    encode_call(APPROVE_SELECTOR, &[Arg::Address(spender), Arg::Uint(value)])
}

/// Calldata for `balanceOf(owner)`.
pub fn encode_balance_of(owner: Address) -> Bytes {
    encode_call(BALANCE_OF_SELECTOR, &[Arg::Address(owner)])
}

/// Calldata for `allowance(owner, spender)`.
pub fn encode_allowance(owner: Address, spender: Address) -> Bytes {
    encode_call(
        ALLOWANCE_SELECTOR,
        &[Arg::Address(owner), Arg::Address(spender)],
    )
}

/// Decode a `uint256` returned by `eth_call`.
///
/// An empty `0x` result decodes as zero.
pub fn decode_uint256(hex_val: &str) -> Result<U256, RpcError> {
    let digits = hex_val.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| RpcError::MalformedResponse(format!("invalid uint256 {}: {}", hex_val, e)))
}
