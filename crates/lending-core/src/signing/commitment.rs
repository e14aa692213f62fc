//! Commitment hashes of a debt order.
//!
//! Field order in every hash follows the debt kernel contract, which
//! recomputes them on-chain when the order is filled.

use alloy_primitives::{B256, U256};

use super::packed::{solidity_keccak256, PackedValue};
use crate::types::{DebtOrder, IssuanceCommitment, OrderTerms, Role};
use crate::validation::ValidationError;

/// Hash of the issuance commitment.
///
/// `soliditySha3(issuanceVersion, debtor, underwriter, underwriterRiskRating,
/// termsContract, termsContractParameters, salt)`
pub fn issuance_commitment_hash(commitment: &IssuanceCommitment) -> B256 {
    let values: [PackedValue; 7] = [
        commitment.issuance_version.into(),
        commitment.debtor.into(),
        commitment.underwriter.into(),
        commitment.underwriter_risk_rating.into(),
        commitment.terms_contract.into(),
        commitment.terms_contract_parameters.into(),
        commitment.salt.into(),
    ];
    solidity_keccak256(&values)
}

/// Derives every commitment hash of a fully specified debt order.
///
/// Holds a copy of the order's terms, so hashes always describe the order as
/// it was when the hasher was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitmentHasher {
    terms: OrderTerms,
}

impl CommitmentHasher {
    pub fn new(terms: OrderTerms) -> Self {
        Self { terms }
    }

    /// Build a hasher for `order`, failing if any hashed field is unset.
    pub fn from_order(order: &DebtOrder) -> Result<Self, ValidationError> {
        Ok(Self::new(order.terms()?))
    }

    pub fn terms(&self) -> &OrderTerms {
        &self.terms
    }

    pub fn issuance_commitment(&self) -> &IssuanceCommitment {
        &self.terms.issuance
    }

    pub fn issuance_commitment_hash(&self) -> B256 {
        issuance_commitment_hash(&self.terms.issuance)
    }

    /// The canonical order hash.
    pub fn order_hash(&self) -> B256 {
        let terms = &self.terms;
        let values: [PackedValue; 10] = [
            terms.kernel_version.into(),
            self.issuance_commitment_hash().into(),
            terms.principal_amount.into(),
            terms.principal_token.into(),
            terms.debtor_fee.into(),
            terms.creditor_fee.into(),
            terms.relayer.into(),
            terms.relayer_fee.into(),
            terms.underwriter_fee.into(),
            terms.expiration_timestamp_in_sec.into(),
        ];
        solidity_keccak256(&values)
    }

    /// Payload the debtor signs. Same as [`Self::order_hash`].
    pub fn debtor_commitment_hash(&self) -> B256 {
        self.order_hash()
    }

    /// Payload the creditor signs. Same as [`Self::order_hash`].
    pub fn creditor_commitment_hash(&self) -> B256 {
        self.order_hash()
    }

    /// Payload the underwriter signs.
    ///
    /// Leaves out the debtor and creditor fees and the relayer, which the
    /// underwriter does not vouch for.
    pub fn underwriter_commitment_hash(&self) -> B256 {
        let terms = &self.terms;
        let values: [PackedValue; 6] = [
            terms.kernel_version.into(),
            self.issuance_commitment_hash().into(),
            terms.principal_amount.into(),
            terms.principal_token.into(),
            terms.underwriter_fee.into(),
            terms.expiration_timestamp_in_sec.into(),
        ];
        solidity_keccak256(&values)
    }

    /// Commitment hash the given role must sign.
    pub fn commitment_hash(&self, role: Role) -> B256 {
        match role {
            Role::Debtor => self.debtor_commitment_hash(),
            Role::Creditor => self.creditor_commitment_hash(),
            Role::Underwriter => self.underwriter_commitment_hash(),
        }
    }

    /// The agreement id: the order hash read as a big-endian integer.
    pub fn agreement_id(&self) -> U256 {
        U256::from_be_bytes(self.order_hash().0)
    }
}
