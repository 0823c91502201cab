//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::SolscopeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `rpc.endpoint`.
pub const RPC_URL_ENV_VAR: &str = "SOLSCOPE_RPC_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SolscopeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), endpoint = %config.rpc.endpoint, "Configuration loaded");
    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
///
/// Environment overrides and validation apply in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<SolscopeConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = SolscopeConfig::default();
            apply_env_overrides(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Parse, apply environment overrides and validate a TOML document.
pub fn parse_config(content: &str) -> Result<SolscopeConfig, ConfigError> {
    let mut config: SolscopeConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut SolscopeConfig) {
    override_endpoint(config, std::env::var(RPC_URL_ENV_VAR).ok());
}

fn override_endpoint(config: &mut SolscopeConfig, endpoint: Option<String>) {
    if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
        tracing::debug!(endpoint = %endpoint, "RPC endpoint overridden from {}", RPC_URL_ENV_VAR);
        config.rpc.endpoint = endpoint;
    }
}
