//! In-process key custodian.
//!
//! Holds private keys in memory, keyed by address. An account can also be
//! registered without a key (locked), which mirrors a node that knows the
//! account but has not unlocked it.

use alloy_primitives::{Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::debug;

use super::custodian::{Custodian, CustodianError};
use crate::{Error, Result};

/// Environment variable holding comma-separated hex private keys.
pub const PRIVATE_KEYS_ENV: &str = "CUSTODIAN_PRIVATE_KEYS";

#[derive(Default)]
pub struct LocalCustodian {
    accounts: RwLock<HashMap<Address, Option<PrivateKeySigner>>>,
}

impl LocalCustodian {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load keys from [`PRIVATE_KEYS_ENV`].
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or any key is malformed.
    pub fn from_env() -> Result<Self> {
        let keys = std::env::var(PRIVATE_KEYS_ENV).map_err(|_| Error::Config {
            message: format!("{} environment variable not set", PRIVATE_KEYS_ENV),
        })?;

        Self::from_private_keys(keys.split(',').filter(|k| !k.trim().is_empty()))
    }

    /// Create a custodian holding the given hex private keys, each
    /// optionally prefixed with "0x".
    pub fn from_private_keys<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut custodian = Self::new();
        for key in keys {
            custodian = custodian.with_signer(parse_private_key(key.as_ref())?);
        }
        Ok(custodian)
    }

    /// Add an unlocked account.
    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.accounts
            .get_mut()
            .insert(signer.address(), Some(signer));
        self
    }

    /// Register an account whose key is not available.
    pub fn with_locked_account(mut self, address: Address) -> Self {
        self.accounts.get_mut().insert(address, None);
        self
    }

    /// Unlock (or add) an account at runtime. Returns its address.
    pub async fn unlock(&self, signer: PrivateKeySigner) -> Address {
        let address = signer.address();
        self.accounts.write().await.insert(address, Some(signer));
        debug!(%address, "Account unlocked");
        address
    }

    /// Drop the key for `address`, keeping the account registered.
    ///
    /// Returns false if the account is unknown.
    pub async fn lock(&self, address: Address) -> bool {
        match self.accounts.write().await.get_mut(&address) {
            Some(slot) => {
                *slot = None;
                debug!(%address, "Account locked");
                true
            }
            None => false,
        }
    }

    /// Every registered address, locked or not.
    pub async fn accounts(&self) -> Vec<Address> {
        let mut accounts: Vec<_> = self.accounts.read().await.keys().copied().collect();
        accounts.sort();
        accounts
    }
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    let key_clean = key.trim().trim_start_matches("0x");
    PrivateKeySigner::from_str(key_clean).map_err(|e| Error::Config {
        message: format!("Invalid private key format - expected 64 hex characters: {}", e),
    })
}

#[async_trait]
impl Custodian for LocalCustodian {
    async fn sign(&self, address: Address, payload: B256) -> std::result::Result<String, CustodianError> {
        if address.is_zero() {
            return Err(CustodianError::InvalidAddress(address));
        }

        let signer = match self.accounts.read().await.get(&address) {
            None => return Err(CustodianError::AccountNotFound(address)),
            Some(None) => return Err(CustodianError::KeyUnavailable(address)),
            Some(Some(signer)) => signer.clone(),
        };

        let signature = signer
            .sign_message(payload.as_slice())
            .await
            .map_err(|e| CustodianError::Backend(e.to_string()))?;

        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

impl std::fmt::Debug for LocalCustodian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose private keys in debug output
        let accounts = self
            .accounts
            .try_read()
            .map(|accounts| accounts.len())
            .unwrap_or_default();
        f.debug_struct("LocalCustodian")
            .field("accounts", &accounts)
            .finish()
    }
}
