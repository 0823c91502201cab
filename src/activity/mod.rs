//! Account activity subsystem.
//!
//! # Data Flow
//! ```text
//! address
//!     → orchestrator.rs (validate, reset, fan out two calls, join, commit)
//!     → types.rs (balance shape normalization, history decoding)
//!     → ActivitySnapshot (visible state) + FetchOutcome (per cycle)
//!     → task.rs (optional: run the cycle on its own cancellable task)
//! ```
//!
//! # Design Decisions
//! - Both calls always settle before the cycle finishes (join, not race)
//! - One failed call never discards the other's result
//! - Each cycle carries a generation number; only the latest may write
//!   the visible snapshot

pub mod orchestrator;
pub mod task;
pub mod types;

pub use orchestrator::{validate_address, FetchOrchestrator};
pub use task::FetchTask;
pub use types::{
    ActivitySnapshot, BalanceResponse, ConfirmationStatus, FetchOutcome, Lamports,
    TransactionOutcome, TransactionSummary, LAMPORTS_PER_SOL,
};
