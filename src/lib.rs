//! SolScope core library.
//!
//! JSON-RPC client and balance / history fetch orchestration for a Solana
//! account viewer.

pub mod activity;
pub mod config;
pub mod display;
pub mod observability;
pub mod rpc;

pub use activity::{ActivitySnapshot, FetchOrchestrator, FetchOutcome, FetchTask, Lamports};
pub use config::SolscopeConfig;
pub use rpc::{ClientState, RpcClient, RpcError, RpcResult};
