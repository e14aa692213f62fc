//! Debt order types.
//!
//! A [`DebtOrder`] is the set of negotiated terms for a loan before every
//! party has signed it. The hashing code never reads a `DebtOrder` directly;
//! it works on the fully populated projections [`IssuanceCommitment`] and
//! [`OrderTerms`], which can only be obtained once the relevant fields are set.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::validation::ValidationError;

/// Negotiated terms of a lending agreement, not yet fully signed.
///
/// Serializes with the protocol's camelCase field names. Unset fields are
/// omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtOrder {
    /// Address of the debt kernel contract that will execute the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<Address>,
    /// Address of the repayment router the debt is issued under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_version: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_amount: Option<U256>,
    /// ERC20 token the principal is denominated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_token: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_fee: Option<U256>,
    /// May stay unset until a creditor fills the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditor: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditor_fee: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer_fee: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underwriter: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underwriter_fee: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underwriter_risk_rating: Option<U256>,
    /// Contract encoding the repayment terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_contract: Option<Address>,
    /// Opaque parameters interpreted by the terms contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_contract_parameters: Option<B256>,
    /// Unix seconds after which the order is void.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_timestamp_in_sec: Option<U256>,
    /// Distinguishes otherwise identical orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<U256>,
}

/// The subset of a debt order identifying which debt instrument is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceCommitment {
    pub issuance_version: Address,
    pub debtor: Address,
    pub underwriter: Address,
    pub underwriter_risk_rating: U256,
    pub terms_contract: Address,
    pub terms_contract_parameters: B256,
    pub salt: U256,
}

/// Every term covered by a debtor, creditor or underwriter commitment hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerms {
    pub issuance: IssuanceCommitment,
    pub kernel_version: Address,
    pub principal_amount: U256,
    pub principal_token: Address,
    pub debtor_fee: U256,
    pub creditor_fee: U256,
    pub relayer: Address,
    pub relayer_fee: U256,
    pub underwriter_fee: U256,
    pub expiration_timestamp_in_sec: U256,
    /// Not part of any hash; carried so the creditor can be resolved as signer.
    pub creditor: Option<Address>,
}

impl DebtOrder {
    /// Project the issuance commitment out of this order.
    pub fn issuance_commitment(&self) -> Result<IssuanceCommitment, ValidationError> {
        if let (
            Some(issuance_version),
            Some(debtor),
            Some(underwriter),
            Some(underwriter_risk_rating),
            Some(terms_contract),
            Some(terms_contract_parameters),
            Some(salt),
        ) = (
            self.issuance_version,
            self.debtor,
            self.underwriter,
            self.underwriter_risk_rating,
            self.terms_contract,
            self.terms_contract_parameters,
            self.salt,
        ) {
            return Ok(IssuanceCommitment {
                issuance_version,
                debtor,
                underwriter,
                underwriter_risk_rating,
                terms_contract,
                terms_contract_parameters,
                salt,
            });
        }

        Err(ValidationError::MissingFields {
            purpose: "issuance commitment",
            fields: self.missing_issuance_fields(),
        })
    }

    /// Project every hashed term out of this order.
    ///
    /// A failure lists every missing hashed field, not only the issuance
    /// commitment's.
    pub fn terms(&self) -> Result<OrderTerms, ValidationError> {
        let issuance = self
            .issuance_commitment()
            .map_err(|_| self.missing_order_hash_fields())?;

        if let (
            Some(kernel_version),
            Some(principal_amount),
            Some(principal_token),
            Some(debtor_fee),
            Some(creditor_fee),
            Some(relayer),
            Some(relayer_fee),
            Some(underwriter_fee),
            Some(expiration_timestamp_in_sec),
        ) = (
            self.kernel_version,
            self.principal_amount,
            self.principal_token,
            self.debtor_fee,
            self.creditor_fee,
            self.relayer,
            self.relayer_fee,
            self.underwriter_fee,
            self.expiration_timestamp_in_sec,
        ) {
            return Ok(OrderTerms {
                issuance,
                kernel_version,
                principal_amount,
                principal_token,
                debtor_fee,
                creditor_fee,
                relayer,
                relayer_fee,
                underwriter_fee,
                expiration_timestamp_in_sec,
                creditor: self.creditor,
            });
        }

        Err(self.missing_order_hash_fields())
    }

    fn missing_order_hash_fields(&self) -> ValidationError {
        ValidationError::MissingFields {
            purpose: "order hash",
            fields: self.missing_fields_for(Role::Debtor),
        }
    }

    /// Address expected to sign for `role`, if set.
    pub fn signer_address(&self, role: Role) -> Option<Address> {
        match role {
            Role::Debtor => self.debtor,
            Role::Creditor => self.creditor,
            Role::Underwriter => self.underwriter,
        }
    }
}

impl OrderTerms {
    /// Address expected to sign for `role`, if known.
    pub fn signer_address(&self, role: Role) -> Option<Address> {
        match role {
            Role::Debtor => Some(self.issuance.debtor),
            Role::Creditor => self.creditor,
            Role::Underwriter => Some(self.issuance.underwriter),
        }
    }
}
