//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits, timeouts)
//! - Check the endpoint is a usable HTTP(S) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SolscopeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::SolscopeConfig;

/// Largest `limit` the endpoint accepts for `getSignaturesForAddress`.
pub const MAX_SIGNATURE_LIMIT: usize = 1000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rpc.endpoint '{endpoint}' is invalid: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("rpc.client_id must not be empty")]
    EmptyClientId,

    #[error("rpc.transport_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("activity.signature_limit must be between 1 and {max}, got {value}")]
    SignatureLimitOutOfRange { value: usize, max: usize },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a parsed config, collecting every problem found.
pub fn validate_config(config: &SolscopeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.rpc.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidEndpoint {
            endpoint: config.rpc.endpoint.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidEndpoint {
            endpoint: config.rpc.endpoint.clone(),
            reason: e.to_string(),
        }),
    }

    if config.rpc.client_id.trim().is_empty() {
        errors.push(ValidationError::EmptyClientId);
    }

    if config.rpc.transport_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    let limit = config.activity.signature_limit;
    if limit == 0 || limit > MAX_SIGNATURE_LIMIT {
        errors.push(ValidationError::SignatureLimitOutOfRange {
            value: limit,
            max: MAX_SIGNATURE_LIMIT,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&SolscopeConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SolscopeConfig::default();
        config.rpc.endpoint = "ftp://example.com".to_string();
        config.rpc.client_id = " ".to_string();
        config.activity.signature_limit = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].to_string().contains("unsupported scheme 'ftp'"));
        assert_eq!(errors[1], ValidationError::EmptyClientId);
        assert_eq!(
            errors[2],
            ValidationError::SignatureLimitOutOfRange { value: 0, max: 1000 }
        );
        assert_eq!(errors[3], ValidationError::UnknownLogLevel("loud".into()));
    }

    #[test]
    fn test_limit_bounds() {
        let mut config = SolscopeConfig::default();
        config.activity.signature_limit = 1000;
        assert!(validate_config(&config).is_ok());

        config.activity.signature_limit = 1001;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = SolscopeConfig::default();
        config.rpc.transport_timeout_secs = Some(0);
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::ZeroTimeout]
        );
    }

    #[test]
    fn test_unparseable_endpoint() {
        let mut config = SolscopeConfig::default();
        config.rpc.endpoint = "mainnet".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidEndpoint { .. }));
    }
}
