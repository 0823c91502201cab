//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read, parse, environment overrides)
//!     → validation.rs (semantic checks)
//!     → SolscopeConfig (validated, immutable)
//!     → RpcClient / FetchOrchestrator constructors
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment overrides are applied before validation

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ActivityConfig, ObservabilityConfig, RpcConfig, SolscopeConfig};
