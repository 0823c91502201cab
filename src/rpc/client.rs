//! JSON-RPC client over HTTP POST.
//!
//! # Responsibilities
//! - Serialize the request envelope and POST it to the endpoint
//! - Decode the response envelope and classify the outcome
//! - Keep the shared loading / error / last-result triple current

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

use crate::config::RpcConfig;
use crate::observability::metrics;
use crate::rpc::state::{ClientState, SharedState};
use crate::rpc::types::{RpcEnvelope, RpcError, RpcRequest, RpcResult};

/// Public mainnet endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

/// JSON-RPC client bound to one endpoint.
///
/// Clones share the same HTTP connection pool and the same observable
/// [`ClientState`].
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    client_id: String,
    shared: Arc<SharedState>,
}

impl RpcClient {
    /// Create a new client from configuration.
    ///
    /// Fails only if the endpoint is not a URL or the HTTP client cannot be
    /// built. No request is sent.
    pub fn new(config: &RpcConfig) -> RpcResult<Self> {
        let endpoint: Url = config.endpoint.parse().map_err(|e| {
            RpcError::Validation(format!("Invalid RPC URL '{}': {}", config.endpoint, e))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.transport_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        tracing::debug!(endpoint = %endpoint, client_id = %config.client_id, "RPC client initialized");

        Ok(Self {
            http,
            endpoint,
            client_id: config.client_id.clone(),
            shared: Arc::new(SharedState::default()),
        })
    }

    /// Create a client for `endpoint` with default settings otherwise.
    pub fn with_endpoint(endpoint: &str) -> RpcResult<Self> {
        Self::new(&RpcConfig {
            endpoint: endpoint.to_string(),
            ..RpcConfig::default()
        })
    }

    /// Perform one call and absorb any failure.
    ///
    /// Returns `None` when the call failed; the reason is then available in
    /// [`ClientState::error`]. A successful `null` result is `Some(Value::Null)`.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Option<Value> {
        let request = match RpcRequest::new(method, params) {
            Ok(request) => request,
            Err(e) => {
                self.report_error(&e);
                return None;
            }
        };
        self.try_call(&request).await.ok()
    }

    /// Perform one call and return the classified outcome.
    ///
    /// State is updated exactly as for [`RpcClient::call`].
    pub async fn try_call(&self, request: &RpcRequest) -> RpcResult<Value> {
        let _loading = self.shared.begin();
        let start = Instant::now();

        let outcome = self.execute(request).await;
        match &outcome {
            Ok(result) => {
                self.shared.record_success(result);
                metrics::record_rpc_call(request.method(), "success", start);
                tracing::debug!(
                    method = %request.method(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "RPC call succeeded"
                );
            }
            Err(e) => {
                self.shared.record_error(&e.to_string());
                metrics::record_rpc_call(request.method(), e.kind(), start);
                tracing::warn!(
                    method = %request.method(),
                    kind = e.kind(),
                    error = %e,
                    "RPC call failed"
                );
            }
        }
        outcome
    }

    async fn execute(&self, request: &RpcRequest) -> RpcResult<Value> {
        let id = format!("{}-{}", self.client_id, Uuid::new_v4());

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request.body(&id))
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let json: Value = match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(_) if !status.is_success() => {
                return Err(RpcError::Transport(format!(
                    "HTTP {}: {}",
                    status,
                    text.trim()
                )));
            }
            Err(e) => {
                return Err(RpcError::Transport(format!("Invalid JSON response: {}", e)));
            }
        };

        let classified = serde_json::from_value::<RpcEnvelope>(json)
            .map_err(|e| RpcError::MalformedEnvelope(e.to_string()))
            .and_then(|envelope| {
                if let Some(response_id) = &envelope.id {
                    if response_id.as_str() != Some(id.as_str()) {
                        tracing::warn!(
                            expected = %id,
                            actual = %response_id,
                            "RPC response id does not match request"
                        );
                    }
                }
                envelope.into_result()
            });

        // A JSON error page from a proxy or rate limiter is not an envelope.
        match classified {
            Err(RpcError::MalformedEnvelope(_)) if !status.is_success() => Err(
                RpcError::Transport(format!("HTTP {}: {}", status, text.trim())),
            ),
            other => other,
        }
    }

    /// Record a failure that happened before any request was sent.
    pub(crate) fn report_error(&self, error: &RpcError) {
        tracing::warn!(kind = error.kind(), error = %error, "Request rejected");
        self.shared.record_error(&error.to_string());
    }

    /// Record a result that arrived but did not have the expected shape.
    pub(crate) fn report_decode_error(&self, error: &RpcError) {
        if let RpcError::Decode { method, .. } = error {
            metrics::record_decode_failure(method);
        }
        tracing::warn!(error = %error, "RPC result could not be decoded");
        self.shared.record_error(&error.to_string());
    }

    /// Current loading / error / last-result snapshot.
    pub fn state(&self) -> ClientState {
        self.shared.snapshot()
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("client_id", &self.client_id)
            .finish()
    }
}
