//! Entry point tying the registry, signer and token API to one network.

use alloy_primitives::{B256, U256};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::{HttpRpcClient, JsonRpc, TokenApi};
use crate::config::Config;
use crate::registry::{self, ContractRegistry};
use crate::signing::{CommitmentHasher, Custodian, SignerError, SignerService};
use crate::types::{DebtOrder, EcdsaSignature, Role};
use crate::Result;

/// Client for one deployment of the lending protocol.
///
/// Orders handed to the signing methods have network defaults applied
/// first, so callers only supply the fields that are specific to a loan.
#[derive(Debug, Clone)]
pub struct LendingClient {
    registry: ContractRegistry,
    signer: SignerService,
    tokens: Arc<TokenApi>,
}

impl LendingClient {
    /// Build a client that talks to the node at `config.rpc.url`.
    ///
    /// `custodian` receives the node transport, so a node-backed custodian
    /// shares it with the token API.
    #[allow(clippy::result_large_err)]
    pub fn new<F>(config: &Config, custodian: F) -> Result<Self>
    where
        F: FnOnce(Arc<dyn JsonRpc>) -> Result<Arc<dyn Custodian>>,
    {
        let rpc: Arc<dyn JsonRpc> = match config.rpc.timeout_secs {
            Some(secs) => Arc::new(HttpRpcClient::with_timeout(
                &config.rpc.url,
                Duration::from_secs(secs),
            )?),
            None => Arc::new(HttpRpcClient::new(&config.rpc.url)),
        };
        let custodian = custodian(rpc.clone())?;

        let registry = ContractRegistry::from_config(&config.contracts);
        info!(
            network_id = registry.network_id,
            rpc_url = %config.rpc.url,
            debt_kernel = %registry.debt_kernel,
            "Lending client configured"
        );

        Ok(Self::with_rpc(
            registry,
            rpc,
            custodian,
            config.rpc.gas_limit,
        ))
    }

    /// Build a client over an existing RPC transport.
    pub fn with_rpc(
        registry: ContractRegistry,
        rpc: Arc<dyn JsonRpc>,
        custodian: Arc<dyn Custodian>,
        gas_limit: u64,
    ) -> Self {
        Self {
            registry,
            signer: SignerService::new(custodian),
            tokens: Arc::new(TokenApi::new(rpc, registry.token_transfer_proxy, gas_limit)),
        }
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    pub fn signer(&self) -> &SignerService {
        &self.signer
    }

    pub fn tokens(&self) -> &TokenApi {
        &self.tokens
    }

    /// Fill network and protocol defaults into `order`.
    pub fn apply_network_defaults(&self, order: &DebtOrder) -> DebtOrder {
        registry::apply_network_defaults(order, &self.registry)
    }

    /// Hasher over `order` after network defaults are applied.
    #[allow(clippy::result_large_err)]
    pub fn hasher(&self, order: &DebtOrder) -> Result<CommitmentHasher> {
        Ok(CommitmentHasher::from_order(&self.apply_network_defaults(order))?)
    }

    #[allow(clippy::result_large_err)]
    pub fn order_hash(&self, order: &DebtOrder) -> Result<B256> {
        Ok(self.hasher(order)?.order_hash())
    }

    #[allow(clippy::result_large_err)]
    pub fn agreement_id(&self, order: &DebtOrder) -> Result<U256> {
        Ok(self.hasher(order)?.agreement_id())
    }

    pub async fn sign_as_debtor(&self, order: &DebtOrder) -> std::result::Result<EcdsaSignature, SignerError> {
        self.sign_as(order, Role::Debtor).await
    }

    pub async fn sign_as_creditor(&self, order: &DebtOrder) -> std::result::Result<EcdsaSignature, SignerError> {
        self.sign_as(order, Role::Creditor).await
    }

    pub async fn sign_as_underwriter(
        &self,
        order: &DebtOrder,
    ) -> std::result::Result<EcdsaSignature, SignerError> {
        self.sign_as(order, Role::Underwriter).await
    }

    pub async fn sign_as(
        &self,
        order: &DebtOrder,
        role: Role,
    ) -> std::result::Result<EcdsaSignature, SignerError> {
        let order = self.apply_network_defaults(order);
        self.signer.sign_as(&order, role).await
    }

    pub fn verify(
        &self,
        order: &DebtOrder,
        role: Role,
        signature: &EcdsaSignature,
    ) -> std::result::Result<bool, SignerError> {
        let order = self.apply_network_defaults(order);
        self.signer.verify(&order, role, signature)
    }
}
