//! Lending Kit: client-side toolkit for a decentralized lending protocol.
//!
//! This is the root crate that provides benchmark and integration-test access
//! to the workspace. For actual functionality, use the individual crates:
//!
//! - `lending-core`: Debt orders, commitment hashing, signing, custodians,
//!   network defaults, ERC20 token API
//! - `lending-cli`: Command-line hashing and signing of orders

pub use lending_core as core;
pub use lending_core::{
    apply_network_defaults, CommitmentHasher, ContractRegistry, Custodian, CustodianError,
    DebtOrder, EcdsaSignature, LendingClient, Role, SignerError, SignerService,
};
