//! Structural validation of debt orders.
//!
//! A debt order is assembled incrementally, so every field is optional at the
//! type level. Before hashing or signing, the fields needed for that purpose
//! must be present; these checks run locally and never touch the network.

use alloy_primitives::Address;
use thiserror::Error;

use crate::types::{DebtOrder, Role};

/// Fields covered by the issuance commitment, in hashing order.
pub const ISSUANCE_COMMITMENT_FIELDS: [&str; 7] = [
    "issuanceVersion",
    "debtor",
    "underwriter",
    "underwriterRiskRating",
    "termsContract",
    "termsContractParameters",
    "salt",
];

/// Fields required on top of the issuance commitment for debtor and
/// underwriter signatures.
pub const SIGNING_FIELDS: [&str; 9] = [
    "kernelVersion",
    "principalAmount",
    "principalToken",
    "debtorFee",
    "creditorFee",
    "relayer",
    "relayerFee",
    "underwriterFee",
    "expirationTimestampInSec",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("debt order is missing fields required for {purpose}: {}", .fields.join(", "))]
    MissingFields {
        purpose: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("{role} address {address} cannot be used to sign a debt order")]
    NullSigner { role: Role, address: Address },
}

impl DebtOrder {
    /// Names of issuance-commitment fields that are unset.
    pub fn missing_issuance_fields(&self) -> Vec<&'static str> {
        let present = [
            self.issuance_version.is_some(),
            self.debtor.is_some(),
            self.underwriter.is_some(),
            self.underwriter_risk_rating.is_some(),
            self.terms_contract.is_some(),
            self.terms_contract_parameters.is_some(),
            self.salt.is_some(),
        ];
        collect_missing(&ISSUANCE_COMMITMENT_FIELDS, &present)
    }

    /// Names of fields that are unset but required to sign as `role`.
    pub fn missing_fields_for(&self, role: Role) -> Vec<&'static str> {
        let present = [
            self.kernel_version.is_some(),
            self.principal_amount.is_some(),
            self.principal_token.is_some(),
            self.debtor_fee.is_some(),
            self.creditor_fee.is_some(),
            self.relayer.is_some(),
            self.relayer_fee.is_some(),
            self.underwriter_fee.is_some(),
            self.expiration_timestamp_in_sec.is_some(),
        ];

        let mut missing = self.missing_issuance_fields();
        missing.extend(collect_missing(&SIGNING_FIELDS, &present));
        if role == Role::Creditor && self.creditor.is_none() {
            missing.push("creditor");
        }
        missing
    }

    /// Check that the order can be signed as `role`.
    ///
    /// Returns the address the custodian must sign with.
    pub fn validate_for(&self, role: Role) -> Result<Address, ValidationError> {
        let missing = self.missing_fields_for(role);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields {
                purpose: role_purpose(role),
                fields: missing,
            });
        }

        let address = self.signer_address(role).ok_or(ValidationError::MissingFields {
            purpose: role_purpose(role),
            fields: vec![role.as_str()],
        })?;

        if address.is_zero() {
            return Err(ValidationError::NullSigner { role, address });
        }

        Ok(address)
    }
}

fn collect_missing(names: &[&'static str], present: &[bool]) -> Vec<&'static str> {
    names
        .iter()
        .zip(present)
        .filter_map(|(name, set)| if *set { None } else { Some(*name) })
        .collect()
}

fn role_purpose(role: Role) -> &'static str {
    match role {
        Role::Debtor => "debtor signature",
        Role::Creditor => "creditor signature",
        Role::Underwriter => "underwriter signature",
    }
}
