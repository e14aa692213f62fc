//! Commitment hashing and multi-party signing of debt orders.
//!
//! # Architecture
//!
//! ```text
//! DebtOrder ── validate ──► OrderTerms
//!                               │
//!                               ▼
//!                       CommitmentHasher ── soliditySha3 ──► commitment hash
//!                               │
//!                               ▼
//! SignerService ── sign(address, hash) ──► Custodian (local keys / node RPC)
//!       │
//!       ▼
//! EcdsaSignature {r, s, v}
//! ```
//!
//! Debtor and creditor sign the same order hash; the underwriter signs a
//! narrower hash covering only principal, fee and expiration terms.
//!
//! # Example
//!
//! ```ignore
//! use lending_core::signing::{LocalCustodian, SignerService};
//! use std::sync::Arc;
//!
//! let custodian = LocalCustodian::new().with_signer(debtor_key);
//! let signer = SignerService::new(Arc::new(custodian));
//!
//! let signature = signer.sign_as_debtor(&order).await?;
//! assert!(signer.verify(&order, Role::Debtor, &signature)?);
//! ```

pub mod commitment;
pub mod custodian;
pub mod local;
pub mod packed;
pub mod rpc_custodian;
pub mod signer;

pub use commitment::{issuance_commitment_hash, CommitmentHasher};
pub use custodian::{Custodian, CustodianError};
pub use local::LocalCustodian;
pub use packed::{solidity_keccak256, PackedValue};
pub use rpc_custodian::RpcCustodian;
pub use signer::{SignerError, SignerService};
