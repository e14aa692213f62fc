//! Error types for the lending client.

use thiserror::Error;

use crate::api::rpc::RpcError;
use crate::api::token::TokenError;
use crate::signing::SignerError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid debt order: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error("Token API error: {0}")]
    Token(#[from] TokenError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

pub type Result<T> = std::result::Result<T, Error>;
