//! The key custodian seam.
//!
//! A custodian holds private keys (a node's unlocked accounts, a local
//! wallet, a remote signer) and produces raw signatures on request. Failures
//! come back classified, so callers never have to inspect error strings.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use thiserror::Error;

use crate::api::rpc::RpcError;

#[derive(Error, Debug)]
pub enum CustodianError {
    #[error("{0} is not a valid account identifier")]
    InvalidAddress(Address),

    #[error("no account registered for {0}")]
    AccountNotFound(Address),

    #[error("private key for {0} is locked or not held")]
    KeyUnavailable(Address),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("signing backend failure: {0}")]
    Backend(String),
}

impl CustodianError {
    /// Whether the failure means the custodian cannot sign as the address,
    /// as opposed to an infrastructure fault.
    pub fn is_key_failure(&self) -> bool {
        matches!(
            self,
            CustodianError::InvalidAddress(_)
                | CustodianError::AccountNotFound(_)
                | CustodianError::KeyUnavailable(_)
        )
    }
}

/// Produces raw ECDSA signatures on behalf of accounts it controls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Custodian: Send + Sync {
    /// Sign `payload` as `address`, returning the `0x`-prefixed hex of the
    /// 65-byte `r || s || v` signature.
    ///
    /// Follows `eth_sign` semantics: the payload is signed with the
    /// `"\x19Ethereum Signed Message:\n32"` prefix.
    async fn sign(&self, address: Address, payload: B256) -> Result<String, CustodianError>;
}
