//! Clients for the Ethereum node and the token contracts it hosts.

pub mod erc20;
pub mod rpc;
pub mod token;

pub use rpc::{HttpRpcClient, JsonRpc, RpcError, ScriptedRpc};
pub use token::{TokenApi, TokenError};
