//! Deployed protocol contracts and the defaults they imply for debt orders.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::config::ContractsConfig;
use crate::types::DebtOrder;

/// Addresses of the protocol contracts on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRegistry {
    pub network_id: u64,
    /// Debt kernel; becomes an order's `kernelVersion`.
    pub debt_kernel: Address,
    /// Repayment router; becomes an order's `issuanceVersion`.
    pub repayment_router: Address,
    /// Proxy that moves tokens on the kernel's behalf; holders approve it.
    pub token_transfer_proxy: Address,
}

impl ContractRegistry {
    pub fn from_config(config: &ContractsConfig) -> Self {
        Self {
            network_id: config.network_id,
            debt_kernel: config.debt_kernel,
            repayment_router: config.repayment_router,
            token_transfer_proxy: config.token_transfer_proxy,
        }
    }
}

/// Fill in every field of `order` that has a network or protocol default.
///
/// `kernelVersion` and `issuanceVersion` come from the registry. The relayer
/// and underwriter default to the null address, and their fees, the debtor
/// and creditor fees and the risk rating default to zero. Fields already set
/// are left alone.
pub fn apply_network_defaults(order: &DebtOrder, registry: &ContractRegistry) -> DebtOrder {
    let mut order = order.clone();

    order.kernel_version.get_or_insert(registry.debt_kernel);
    order
        .issuance_version
        .get_or_insert(registry.repayment_router);

    order.relayer.get_or_insert(Address::ZERO);
    order.underwriter.get_or_insert(Address::ZERO);

    for fee in [
        &mut order.debtor_fee,
        &mut order.creditor_fee,
        &mut order.relayer_fee,
        &mut order.underwriter_fee,
        &mut order.underwriter_risk_rating,
    ] {
        fee.get_or_insert(U256::ZERO);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ContractRegistry {
        ContractRegistry {
            network_id: 70,
            debt_kernel: Address::repeat_byte(0xd1),
            repayment_router: Address::repeat_byte(0xd2),
            token_transfer_proxy: Address::repeat_byte(0xd3),
        }
    }

    #[test]
    fn test_defaults_fill_unset_fields() {
        let order = apply_network_defaults(&DebtOrder::default(), &registry());

        assert_eq!(order.kernel_version, Some(Address::repeat_byte(0xd1)));
        assert_eq!(order.issuance_version, Some(Address::repeat_byte(0xd2)));
        assert_eq!(order.relayer, Some(Address::ZERO));
        assert_eq!(order.underwriter, Some(Address::ZERO));
        assert_eq!(order.debtor_fee, Some(U256::ZERO));
        assert_eq!(order.creditor_fee, Some(U256::ZERO));
        assert_eq!(order.relayer_fee, Some(U256::ZERO));
        assert_eq!(order.underwriter_fee, Some(U256::ZERO));
        assert_eq!(order.underwriter_risk_rating, Some(U256::ZERO));

        // Party and economic terms have no default.
        assert_eq!(order.debtor, None);
        assert_eq!(order.creditor, None);
        assert_eq!(order.principal_amount, None);
        assert_eq!(order.salt, None);
        assert_eq!(order.expiration_timestamp_in_sec, None);
    }

    #[test]
    fn test_defaults_never_overwrite() {
        let order = DebtOrder {
            kernel_version: Some(Address::repeat_byte(0x01)),
            issuance_version: Some(Address::repeat_byte(0x02)),
            underwriter: Some(Address::repeat_byte(0x03)),
            debtor_fee: Some(U256::from(9u64)),
            ..Default::default()
        };

        let defaulted = apply_network_defaults(&order, &registry());
        assert_eq!(defaulted.kernel_version, order.kernel_version);
        assert_eq!(defaulted.issuance_version, order.issuance_version);
        assert_eq!(defaulted.underwriter, order.underwriter);
        assert_eq!(defaulted.debtor_fee, order.debtor_fee);
    }

    #[test]
    fn test_defaults_idempotent() {
        let once = apply_network_defaults(&DebtOrder::default(), &registry());
        let twice = apply_network_defaults(&once, &registry());
        assert_eq!(once, twice);
    }
}
