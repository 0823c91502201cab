//! Wire types and error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Errors that can occur during an RPC call or a fetch cycle.
///
/// `Display` is the human-readable text stored in client state, so the
/// transport and protocol variants print the underlying message only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// Input rejected before any network activity.
    #[error("{0}")]
    Validation(String),

    /// Network failure, HTTP-layer failure or a body that is not JSON.
    #[error("{0}")]
    Transport(String),

    /// The endpoint answered with an `error` object.
    #[error("{message}")]
    Protocol {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// The envelope carried both or neither of `result` and `error`.
    #[error("Malformed RPC response: {0}")]
    MalformedEnvelope(String),

    /// A well-formed result did not have the expected shape.
    #[error("Unexpected {method} result: {reason}")]
    Decode { method: String, reason: String },

    /// The fetch task was cancelled before it settled.
    #[error("Request cancelled")]
    Cancelled,
}

impl RpcError {
    /// Short label used for metrics and structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Validation(_) => "validation",
            RpcError::Transport(_) => "transport",
            RpcError::Protocol { .. } | RpcError::MalformedEnvelope(_) => "protocol",
            RpcError::Decode { .. } => "decode",
            RpcError::Cancelled => "cancelled",
        }
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// A single JSON-RPC request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    method: String,
    params: Vec<Value>,
}

impl RpcRequest {
    /// Build a request. The method name must not be empty.
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> RpcResult<Self> {
        let method = method.into();
        if method.trim().is_empty() {
            return Err(RpcError::Validation("RPC method name is empty".to_string()));
        }
        Ok(Self { method, params })
    }

    /// Build a request for a method name fixed at compile time.
    pub(crate) fn fixed(method: &'static str, params: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            params,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Body sent on the wire, tagged with the given request id.
    pub fn body<'a>(&'a self, id: &'a str) -> RequestBody<'a> {
        RequestBody {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: &self.method,
            params: &self.params,
        }
    }
}

/// Serialized form of [`RpcRequest`].
#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    pub jsonrpc: &'static str,
    pub id: &'a str,
    pub method: &'a str,
    pub params: &'a [Value],
}

/// The `error` member of a response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Response envelope.
///
/// `result` is `Some(Value::Null)` when the endpoint sent `"result": null`
/// and `None` when the member is missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcEnvelope {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcEnvelope {
    /// Classify the envelope as a result or a protocol failure.
    pub fn into_result(self) -> RpcResult<Value> {
        match (self.result, self.error) {
            (Some(result), None) => Ok(result),
            (None, Some(err)) => Err(RpcError::Protocol {
                code: err.code,
                message: err.message,
                data: err.data,
            }),
            (Some(_), Some(_)) => Err(RpcError::MalformedEnvelope(
                "both result and error present".to_string(),
            )),
            (None, None) => Err(RpcError::MalformedEnvelope(
                "neither result nor error present".to_string(),
            )),
        }
    }
}
