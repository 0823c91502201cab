//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! rpc::client, activity::orchestrator produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or config)
//!     → any metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so stdout carries only command output
//! - No recorder is installed here; metric calls are no-ops until one is

pub mod logging;
pub mod metrics;
