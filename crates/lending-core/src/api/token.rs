//! ERC20 token API.
//!
//! Reads go through `eth_call`. Writes are submitted with
//! `eth_sendTransaction`, so the sending account must be managed by the
//! node. Writes are checked against current balances and allowances first,
//! which turns the common revert causes into typed errors.

use alloy_primitives::{Address, Bytes, B256, U256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::erc20;
use super::rpc::{expect_str, JsonRpc, RpcError};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("No contract deployed at {address}")]
    NotAContract { address: Address },

    #[error("Insufficient balance: {owner} holds {available}, needs {required}")]
    InsufficientBalance {
        owner: Address,
        available: U256,
        required: U256,
    },

    #[error("Insufficient allowance: {spender} may move {available} from {owner}, needs {required}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: U256,
        required: U256,
    },

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Client for ERC20 tokens and the token transfer proxy allowances the debt
/// kernel relies on.
#[derive(Clone)]
pub struct TokenApi {
    rpc: Arc<dyn JsonRpc>,
    token_transfer_proxy: Address,
    gas_limit: u64,
}

impl TokenApi {
    pub fn new(rpc: Arc<dyn JsonRpc>, token_transfer_proxy: Address, gas_limit: u64) -> Self {
        Self {
            rpc,
            token_transfer_proxy,
            gas_limit,
        }
    }

    pub fn token_transfer_proxy(&self) -> Address {
        self.token_transfer_proxy
    }

    /// Token balance of `owner`.
    pub async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, TokenError> {
        self.ensure_contract(token).await?;
        self.call_uint(token, erc20::encode_balance_of(owner)).await
    }

    /// Amount `spender` may move out of `owner`'s balance.
    pub async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, TokenError> {
        self.ensure_contract(token).await?;
        self.call_uint(token, erc20::encode_allowance(owner, spender))
            .await
    }

    /// Allowance `owner` has granted the token transfer proxy.
    pub async fn proxy_allowance(&self, token: Address, owner: Address) -> Result<U256, TokenError> {
        self.allowance(token, owner, self.token_transfer_proxy).await
    }

    /// Transfer `value` from `from` to `to`. Returns the transaction hash.
    pub async fn transfer(
        &self,
        token: Address,
        to: Address,
        value: U256,
        from: Address,
    ) -> Result<B256, TokenError> {
        self.ensure_balance(token, from, value).await?;

        let tx_hash = self
            .send_transaction(from, token, erc20::encode_transfer(to, value))
            .await?;
        info!(%token, %from, %to, %value, %tx_hash, "Token transfer submitted");
        Ok(tx_hash)
    }

    /// Move `value` from `from` to `to` using `sender`'s allowance.
    pub async fn transfer_from(
        &self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
        sender: Address,
    ) -> Result<B256, TokenError> {
        self.ensure_balance(token, from, value).await?;

        let available = self
            .call_uint(token, erc20::encode_allowance(from, sender))
            .await?;
        if available < value {
            return Err(TokenError::InsufficientAllowance {
                owner: from,
                spender: sender,
                available,
                required: value,
            });
        }

        let tx_hash = self
            .send_transaction(sender, token, erc20::encode_transfer_from(from, to, value))
            .await?;
        info!(%token, %from, %to, %value, %tx_hash, "Token transferFrom submitted");
        Ok(tx_hash)
    }

    /// Allow `spender` to move up to `value` of `owner`'s tokens.
    pub async fn approve(
        &self,
        token: Address,
        spender: Address,
        value: U256,
        owner: Address,
    ) -> Result<B256, TokenError> {
        self.ensure_contract(token).await?;

        let tx_hash = self
            .send_transaction(owner, token, erc20::encode_approve(spender, value))
            .await?;
        info!(%token, %owner, %spender, %value, %tx_hash, "Token approval submitted");
        Ok(tx_hash)
    }

    /// Set the token transfer proxy's allowance over `owner`'s tokens.
    pub async fn set_proxy_allowance(
        &self,
        token: Address,
        value: U256,
        owner: Address,
    ) -> Result<B256, TokenError> {
        self.approve(token, self.token_transfer_proxy, value, owner)
            .await
    }

    /// Let the token transfer proxy move any amount of `owner`'s tokens.
    pub async fn set_unlimited_proxy_allowance(
        &self,
        token: Address,
        owner: Address,
    ) -> Result<B256, TokenError> {
        self.set_proxy_allowance(token, U256::MAX, owner).await
    }

    async fn ensure_contract(&self, address: Address) -> Result<(), TokenError> {
        let code = self
            .rpc
            .call(
                "eth_getCode",
                serde_json::json!([format!("{:?}", address), "latest"]),
            )
            .await?;

        if expect_str(&code)?.trim_start_matches("0x").is_empty() {
            return Err(TokenError::NotAContract { address });
        }
        Ok(())
    }

    async fn ensure_balance(
        &self,
        token: Address,
        owner: Address,
        required: U256,
    ) -> Result<(), TokenError> {
        let available = self.balance_of(token, owner).await?;
        if available < required {
            return Err(TokenError::InsufficientBalance {
                owner,
                available,
                required,
            });
        }
        Ok(())
    }

    async fn call_uint(&self, to: Address, data: Bytes) -> Result<U256, TokenError> {
        let result = self
            .rpc
            .call(
                "eth_call",
                serde_json::json!([
                    { "to": format!("{:?}", to), "data": format!("0x{}", hex::encode(&data)) },
                    "latest"
                ]),
            )
            .await?;

        Ok(erc20::decode_uint256(expect_str(&result)?)?)
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<B256, TokenError> {
        debug!(%from, %to, gas = self.gas_limit, "Submitting eth_sendTransaction");
        let result = self
            .rpc
            .call(
                "eth_sendTransaction",
                serde_json::json!([{
                    "from": format!("{:?}", from),
                    "to": format!("{:?}", to),
                    "gas": format!("0x{:x}", self.gas_limit),
                    "data": format!("0x{}", hex::encode(&data)),
                }]),
            )
            .await?;

        let tx_hash = expect_str(&result)?;
        tx_hash.parse::<B256>().map_err(|e| {
            TokenError::Rpc(RpcError::MalformedResponse(format!(
                "invalid transaction hash {}: {}",
                tx_hash, e
            )))
        })
    }
}

impl std::fmt::Debug for TokenApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenApi")
            .field("token_transfer_proxy", &self.token_transfer_proxy)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}
