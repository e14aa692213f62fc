//! Debt order signing for debtors, creditors and underwriters.
//!
//! Each role signs its commitment hash through a [`Custodian`]. The order is
//! validated before the custodian is contacted, so an incomplete order never
//! costs a round trip.

use alloy_primitives::{Address, B256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::commitment::CommitmentHasher;
use super::custodian::{Custodian, CustodianError};
use crate::types::{DebtOrder, EcdsaSignature, Role, SignatureParseError};
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid debt order: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unable to sign debt order because private key associated with {address} is invalid or unavailable")]
    InvalidSigningKey { address: Address },

    #[error(transparent)]
    Custodian(CustodianError),

    #[error("Custodian returned a malformed signature: {0}")]
    MalformedSignature(#[from] SignatureParseError),
}

/// Signs debt orders on behalf of their parties.
///
/// Stateless apart from the custodian handle; safe to share across tasks and
/// to sign several roles or orders concurrently.
#[derive(Clone)]
pub struct SignerService {
    custodian: Arc<dyn Custodian>,
}

impl SignerService {
    pub fn new(custodian: Arc<dyn Custodian>) -> Self {
        Self { custodian }
    }

    /// Sign the debtor commitment hash with the debtor's key.
    pub async fn sign_as_debtor(&self, order: &DebtOrder) -> Result<EcdsaSignature, SignerError> {
        self.sign_as(order, Role::Debtor).await
    }

    /// Sign the creditor commitment hash with the creditor's key.
    pub async fn sign_as_creditor(&self, order: &DebtOrder) -> Result<EcdsaSignature, SignerError> {
        self.sign_as(order, Role::Creditor).await
    }

    /// Sign the underwriter commitment hash with the underwriter's key.
    pub async fn sign_as_underwriter(
        &self,
        order: &DebtOrder,
    ) -> Result<EcdsaSignature, SignerError> {
        self.sign_as(order, Role::Underwriter).await
    }

    /// Sign the commitment hash `role` is responsible for.
    ///
    /// # Errors
    ///
    /// - [`SignerError::Validation`] if the order lacks a field the role's
    ///   hash covers, or the role's address is unset or null. The custodian
    ///   is not contacted.
    /// - [`SignerError::InvalidSigningKey`] if the custodian cannot sign as
    ///   the role's address.
    /// - [`SignerError::Custodian`] for any other custodian failure.
    pub async fn sign_as(
        &self,
        order: &DebtOrder,
        role: Role,
    ) -> Result<EcdsaSignature, SignerError> {
        let address = order.validate_for(role)?;
        let digest = CommitmentHasher::from_order(order)?.commitment_hash(role);

        debug!(%role, signer = %address, digest = %digest, "Signing commitment hash");
        let signature = self.sign_payload_with_address(digest, address).await?;
        info!(%role, signer = %address, "Debt order signed");

        Ok(signature)
    }

    /// Whether `signature` is `role`'s signature over the order's commitment hash.
    pub fn verify(
        &self,
        order: &DebtOrder,
        role: Role,
        signature: &EcdsaSignature,
    ) -> Result<bool, SignerError> {
        let address = order.validate_for(role)?;
        let digest = CommitmentHasher::from_order(order)?.commitment_hash(role);
        Ok(signature.is_valid_for(digest, address))
    }

    async fn sign_payload_with_address(
        &self,
        payload: B256,
        address: Address,
    ) -> Result<EcdsaSignature, SignerError> {
        match self.custodian.sign(address, payload).await {
            Ok(raw) => Ok(EcdsaSignature::from_rsv_hex(&raw)?),
            Err(e) if e.is_key_failure() => {
                warn!(%address, error = %e, "Custodian cannot sign for address");
                Err(SignerError::InvalidSigningKey { address })
            }
            Err(e) => Err(SignerError::Custodian(e)),
        }
    }
}

impl std::fmt::Debug for SignerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rpc::RpcError;
    use crate::signing::custodian::MockCustodian;
    use crate::signing::local::LocalCustodian;
    use crate::types::debt_order::fixtures::complete_order;
    use alloy_signer_local::PrivateKeySigner;
    use std::str::FromStr;

    // Well-known development keys (DO NOT USE IN PRODUCTION)
    const DEBTOR_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const CREDITOR_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const UNDERWRITER_KEY: &str =
        "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

    fn key(hex: &str) -> PrivateKeySigner {
        PrivateKeySigner::from_str(hex).unwrap()
    }

    /// A complete order whose parties are the three development keys.
    fn signable_order() -> DebtOrder {
        let mut order = complete_order();
        order.debtor = Some(key(DEBTOR_KEY).address());
        order.creditor = Some(key(CREDITOR_KEY).address());
        order.underwriter = Some(key(UNDERWRITER_KEY).address());
        order
    }

    fn local_service() -> SignerService {
        let custodian = LocalCustodian::new()
            .with_signer(key(DEBTOR_KEY))
            .with_signer(key(CREDITOR_KEY))
            .with_signer(key(UNDERWRITER_KEY));
        SignerService::new(Arc::new(custodian))
    }

    fn raw_signature(v: u8) -> String {
        format!("0x{}{}{:02x}", "11".repeat(32), "22".repeat(32), v)
    }

    #[tokio::test]
    async fn test_sign_as_each_role() {
        let service = local_service();
        let order = signable_order();

        for role in Role::ALL {
            let signature = service.sign_as(&order, role).await.unwrap();
            assert!(signature.v == 27 || signature.v == 28);
            assert!(service.verify(&order, role, &signature).unwrap(), "{role}");
        }
    }

    #[tokio::test]
    async fn test_debtor_and_creditor_sign_same_digest() {
        let service = local_service();
        let order = signable_order();
        let digest = CommitmentHasher::from_order(&order).unwrap().order_hash();

        let debtor_sig = service.sign_as_debtor(&order).await.unwrap();
        let creditor_sig = service.sign_as_creditor(&order).await.unwrap();

        assert!(debtor_sig.is_valid_for(digest, order.debtor.unwrap()));
        assert!(creditor_sig.is_valid_for(digest, order.creditor.unwrap()));
    }

    #[tokio::test]
    async fn test_underwriter_signature_does_not_verify_as_debtor() {
        let service = local_service();
        let order = signable_order();

        let signature = service.sign_as_underwriter(&order).await.unwrap();
        assert!(service.verify(&order, Role::Underwriter, &signature).unwrap());
        assert!(!service.verify(&order, Role::Debtor, &signature).unwrap());
    }

    #[tokio::test]
    async fn test_resigning_verifies_against_same_digest() {
        let service = local_service();
        let order = signable_order();

        let first = service.sign_as_debtor(&order).await.unwrap();
        let second = service.sign_as_debtor(&order).await.unwrap();

        assert!(service.verify(&order, Role::Debtor, &first).unwrap());
        assert!(service.verify(&order, Role::Debtor, &second).unwrap());
    }

    #[tokio::test]
    async fn test_incomplete_order_never_reaches_custodian() {
        let mut custodian = MockCustodian::new();
        custodian.expect_sign().never();
        let service = SignerService::new(Arc::new(custodian));

        let mut order = signable_order();
        order.terms_contract = None;

        let result = service.sign_as_underwriter(&order).await;
        match result {
            Err(SignerError::Validation(ValidationError::MissingFields { fields, .. })) => {
                assert_eq!(fields, vec!["termsContract"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_creditor_never_reaches_custodian() {
        let mut custodian = MockCustodian::new();
        custodian.expect_sign().never();
        let service = SignerService::new(Arc::new(custodian));

        let mut order = signable_order();
        order.creditor = None;

        assert!(matches!(
            service.sign_as_creditor(&order).await,
            Err(SignerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_key_failures_normalized() {
        let order = signable_order();
        let debtor = order.debtor.unwrap();
        let failures: [fn(Address) -> CustodianError; 3] = [
            CustodianError::InvalidAddress,
            CustodianError::AccountNotFound,
            CustodianError::KeyUnavailable,
        ];

        for failure in failures {
            let mut custodian = MockCustodian::new();
            custodian
                .expect_sign()
                .times(1)
                .returning(move |address, _| Err(failure(address)));
            let service = SignerService::new(Arc::new(custodian));

            let err = service.sign_as_debtor(&order).await.unwrap_err();
            match &err {
                SignerError::InvalidSigningKey { address } => assert_eq!(*address, debtor),
                other => panic!("expected invalid signing key, got {:?}", other),
            }
            assert!(err.to_string().contains(&debtor.to_string()));
        }
    }

    #[tokio::test]
    async fn test_other_custodian_errors_propagate() {
        let mut custodian = MockCustodian::new();
        custodian.expect_sign().times(1).returning(|_, _| {
            Err(CustodianError::Rpc(RpcError::Node {
                code: -32603,
                message: "internal error".to_string(),
            }))
        });
        let service = SignerService::new(Arc::new(custodian));

        let err = service.sign_as_debtor(&signable_order()).await.unwrap_err();
        match err {
            SignerError::Custodian(CustodianError::Rpc(RpcError::Node { code, message })) => {
                assert_eq!(code, -32603);
                assert_eq!(message, "internal error");
            }
            other => panic!("expected custodian error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custodian_receives_role_digest() {
        let order = signable_order();
        let hasher = CommitmentHasher::from_order(&order).unwrap();
        let underwriter = order.underwriter.unwrap();
        let expected = hasher.underwriter_commitment_hash();

        let mut custodian = MockCustodian::new();
        custodian
            .expect_sign()
            .withf(move |address, payload| *address == underwriter && *payload == expected)
            .times(1)
            .returning(|_, _| Ok(raw_signature(1)));
        let service = SignerService::new(Arc::new(custodian));

        let signature = service.sign_as_underwriter(&order).await.unwrap();
        assert_eq!(signature.v, 28);
        assert_eq!(signature.r, B256::repeat_byte(0x11));
    }

    #[tokio::test]
    async fn test_malformed_signature_reported() {
        let mut custodian = MockCustodian::new();
        custodian
            .expect_sign()
            .returning(|_, _| Ok("0xdeadbeef".to_string()));
        let service = SignerService::new(Arc::new(custodian));

        assert!(matches!(
            service.sign_as_debtor(&signable_order()).await,
            Err(SignerError::MalformedSignature(SignatureParseError::InvalidLength(4)))
        ));
    }

    #[tokio::test]
    async fn test_zero_based_recovery_id_from_json_verifies() {
        let service = local_service();
        let order = signable_order();
        let signature = service.sign_as_debtor(&order).await.unwrap();

        let json = serde_json::json!({
            "r": signature.r,
            "s": signature.s,
            "v": signature.v - 27,
        });
        let decoded: EcdsaSignature = serde_json::from_value(json).unwrap();

        assert_eq!(decoded, signature);
        assert!(service.verify(&order, Role::Debtor, &decoded).unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_signing() {
        let service = local_service();
        let order = signable_order();

        let (debtor, creditor, underwriter) = tokio::join!(
            service.sign_as_debtor(&order),
            service.sign_as_creditor(&order),
            service.sign_as_underwriter(&order),
        );

        assert!(service.verify(&order, Role::Debtor, &debtor.unwrap()).unwrap());
        assert!(service.verify(&order, Role::Creditor, &creditor.unwrap()).unwrap());
        assert!(service
            .verify(&order, Role::Underwriter, &underwriter.unwrap())
            .unwrap());
    }
}
