//! Configuration management for the lending client.

use alloy_primitives::Address;
use serde::Deserialize;
use std::env;

use crate::{Error, Result};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    pub contracts: ContractsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    /// Request timeout; `None` leaves the HTTP client's default.
    pub timeout_secs: Option<u64>,
    /// Gas forwarded with every token transaction.
    pub gas_limit: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    pub network_id: u64,
    pub debt_kernel: Address,
    pub repayment_router: Address,
    pub token_transfer_proxy: Address,
}

/// Network id of a local development chain.
pub const DEFAULT_NETWORK_ID: u64 = 70;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

pub const DEFAULT_GAS_LIMIT: u64 = 400_000;

impl Config {
    /// Load configuration from environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[allow(clippy::result_large_err)]
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            rpc: RpcConfig {
                url: lookup("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
                timeout_secs: parse_optional(&lookup, "RPC_TIMEOUT_SECS")?,
                gas_limit: parse_optional(&lookup, "TX_GAS_LIMIT")?.unwrap_or(DEFAULT_GAS_LIMIT),
            },
            contracts: ContractsConfig {
                network_id: parse_optional(&lookup, "NETWORK_ID")?.unwrap_or(DEFAULT_NETWORK_ID),
                debt_kernel: required_address(&lookup, "DEBT_KERNEL_ADDRESS")?,
                repayment_router: required_address(&lookup, "REPAYMENT_ROUTER_ADDRESS")?,
                token_transfer_proxy: required_address(&lookup, "TOKEN_TRANSFER_PROXY_ADDRESS")?,
            },
        })
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            rpc: RpcConfig {
                url: DEFAULT_RPC_URL.to_string(),
                timeout_secs: Some(5),
                gas_limit: DEFAULT_GAS_LIMIT,
            },
            contracts: ContractsConfig {
                network_id: DEFAULT_NETWORK_ID,
                debt_kernel: Address::repeat_byte(0xd1),
                repayment_router: Address::repeat_byte(0xd2),
                token_transfer_proxy: Address::repeat_byte(0xd3),
            },
        }
    }
}

fn required_address<F>(lookup: &F, key: &str) -> Result<Address>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| Error::Config {
        message: format!("{} environment variable not set", key),
    })?;
    value.trim().parse().map_err(|e| Error::Config {
        message: format!("{} is not a valid address: {}", key, e),
    })
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| Error::Config {
                message: format!("{} has invalid value '{}': {}", key, value, e),
            })
        })
        .transpose()
}
