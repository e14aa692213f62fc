//! Lending Core Library
//!
//! Debt order types, commitment hashing, multi-party signing, contract
//! registry defaults and the ERC20 token API for the lending protocol client.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod registry;
pub mod signing;
pub mod types;
pub mod validation;

pub use client::LendingClient;
pub use error::{Error, Result};
pub use registry::{apply_network_defaults, ContractRegistry};
pub use signing::{CommitmentHasher, Custodian, CustodianError, SignerError, SignerService};
pub use types::{DebtOrder, EcdsaSignature, IssuanceCommitment, OrderTerms, Role};
pub use validation::ValidationError;
