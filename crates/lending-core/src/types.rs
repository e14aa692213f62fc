//! Core domain types for the lending protocol client.

pub mod debt_order;
pub mod role;
pub mod signature;

pub use debt_order::*;
pub use role::*;
pub use signature::*;
