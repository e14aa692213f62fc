//! Custodian backed by a node's `eth_sign`.
//!
//! Nodes report key problems only as free-form error messages, so this is the
//! one place that inspects message text. Everything above it works with
//! [`CustodianError`] variants.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::custodian::{Custodian, CustodianError};
use crate::api::rpc::{expect_str, JsonRpc, RpcError};

/// Message fragments meaning the address itself was rejected.
const INVALID_ADDRESS_MESSAGES: &[&str] = &["invalid address"];

/// Message fragments meaning the node does not manage the account.
const ACCOUNT_NOT_FOUND_MESSAGES: &[&str] = &["account not found", "unknown account"];

/// Message fragments meaning the account exists but its key is not usable.
const KEY_UNAVAILABLE_MESSAGES: &[&str] = &[
    "cannot sign data; no private key",
    "authentication needed",
    "account is locked",
];

pub struct RpcCustodian {
    rpc: Arc<dyn JsonRpc>,
}

impl RpcCustodian {
    pub fn new(rpc: Arc<dyn JsonRpc>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl Custodian for RpcCustodian {
    async fn sign(&self, address: Address, payload: B256) -> Result<String, CustodianError> {
        let params = serde_json::json!([
            format!("{:?}", address),
            format!("0x{}", hex::encode(payload)),
        ]);
        debug!(%address, "Requesting eth_sign");

        let result = self
            .rpc
            .call("eth_sign", params)
            .await
            .map_err(|e| classify_rpc_error(address, e))?;

        Ok(expect_str(&result)?.to_string())
    }
}

/// Map a node error for an `eth_sign` request onto a custodian error.
pub fn classify_rpc_error(address: Address, error: RpcError) -> CustodianError {
    if let RpcError::Node { message, .. } = &error {
        let message = message.to_ascii_lowercase();
        let mentions = |fragments: &[&str]| fragments.iter().any(|f| message.contains(f));

        if mentions(INVALID_ADDRESS_MESSAGES) {
            return CustodianError::InvalidAddress(address);
        }
        if mentions(ACCOUNT_NOT_FOUND_MESSAGES) {
            return CustodianError::AccountNotFound(address);
        }
        if mentions(KEY_UNAVAILABLE_MESSAGES) {
            return CustodianError::KeyUnavailable(address);
        }
    }
    CustodianError::Rpc(error)
}
