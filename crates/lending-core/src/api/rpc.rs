//! JSON-RPC client for an Ethereum node.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC request failed with HTTP status {status}")]
    Status { status: u16 },

    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),
}

/// A JSON-RPC transport.
#[async_trait]
pub trait JsonRpc: Send + Sync {
    /// Call `method` with `params` and return the `result` member.
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, RpcError>;
}

/// JSON-RPC over HTTP.
pub struct HttpRpcClient {
    rpc_url: String,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a client for the given node URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::with_http_client(rpc_url, reqwest::Client::new())
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(rpc_url, http_client))
    }

    pub fn with_http_client(rpc_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            http_client,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl JsonRpc for HttpRpcClient {
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, "Sending RPC request");

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RpcError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: JsonRpcResponse = response.json().await?;
        body.into_result()
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

impl JsonRpcResponse {
    fn into_result(self) -> Result<serde_json::Value, RpcError> {
        if let Some(error) = self.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| RpcError::MalformedResponse("missing result".to_string()))
    }
}

/// Extract a string result, as returned by most `eth_*` methods.
pub fn expect_str(value: &serde_json::Value) -> Result<&str, RpcError> {
    value
        .as_str()
        .ok_or_else(|| RpcError::MalformedResponse(format!("expected string result, got {}", value)))
}

type Handler = Box<dyn Fn(&serde_json::Value) -> Result<serde_json::Value, RpcError> + Send + Sync>;

/// In-memory JSON-RPC transport for testing.
///
/// Answers each method from a registered handler and records every call.
/// Methods without a handler fail the way a node does for unknown methods.
#[derive(Default)]
pub struct ScriptedRpc {
    handlers: HashMap<String, Handler>,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl ScriptedRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `method` with `result`.
    pub fn respond(self, method: &str, result: serde_json::Value) -> Self {
        self.respond_with(method, move |_| Ok(result.clone()))
    }

    /// Always fail `method` with a node error.
    pub fn fail(self, method: &str, code: i64, message: &str) -> Self {
        let message = message.to_string();
        self.respond_with(method, move |_| {
            Err(RpcError::Node {
                code,
                message: message.clone(),
            })
        })
    }

    /// Answer `method` by inspecting the request params.
    pub fn respond_with<F>(mut self, method: &str, handler: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<serde_json::Value, RpcError> + Send + Sync + 'static,
    {
        self.handlers.insert(method.to_string(), Box::new(handler));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of calls received for `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }
}

#[async_trait]
impl JsonRpc for ScriptedRpc {
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, RpcError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((method.to_string(), params.clone()));
        }

        match self.handlers.get(method) {
            Some(handler) => handler(&params),
            None => Err(RpcError::Node {
                code: -32601,
                message: format!("the method {} does not exist/is not available", method),
            }),
        }
    }
}
