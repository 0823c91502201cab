//! JSON-RPC client subsystem.
//!
//! # Data Flow
//! ```text
//! method + params
//!     → types.rs (RpcRequest, wire body)
//!     → client.rs (HTTP POST, envelope decoding, outcome classification)
//!     → state.rs (shared loading / error / last result)
//! ```
//!
//! # Design Decisions
//! - One call per invocation, no retries
//! - `call` never returns an error: failures land in `ClientState::error`
//! - `try_call` keeps the typed error for callers that need to know which call failed
//! - Loading is cleared by a guard, so every exit path releases it

pub mod client;
pub mod state;
pub mod types;

pub use client::{RpcClient, DEFAULT_ENDPOINT};
pub use state::ClientState;
pub use types::{RpcEnvelope, RpcError, RpcErrorObject, RpcRequest, RpcResult};
