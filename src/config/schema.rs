//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::rpc::DEFAULT_ENDPOINT;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SolscopeConfig {
    /// JSON-RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Balance + history fetch settings.
    pub activity: ActivityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub endpoint: String,

    /// Prefix of every request id (`<client_id>-<uuid>`).
    pub client_id: String,

    /// Optional whole-request timeout for the HTTP transport, in seconds.
    /// Unset leaves the transport's own behaviour in place.
    pub transport_timeout_secs: Option<u64>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client_id: "solscope-app".to_string(),
            transport_timeout_secs: None,
        }
    }
}

/// Fetch orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ActivityConfig {
    /// `limit` passed to `getSignaturesForAddress`.
    pub signature_limit: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self { signature_limit: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
