//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Keep the simulation delay and provider timeout inside the request timeout
//! - Check addresses and the provider URL parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }

    match url::Url::parse(&config.provider.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "provider.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "provider.url",
            format!("invalid URL '{}': {}", config.provider.url, e),
        )),
    }

    if config.provider.timeout_secs == 0 {
        errors.push(ValidationError::new("provider.timeout_secs", "must be greater than 0"));
    }
    if config.provider.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "provider.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.provider.max_response_bytes == 0 {
        errors.push(ValidationError::new(
            "provider.max_response_bytes",
            "must be greater than 0",
        ));
    }
    if config.upload.max_file_bytes == 0 {
        errors.push(ValidationError::new("upload.max_file_bytes", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    } else if config.timeouts.request_secs <= config.provider.timeout_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must exceed provider.timeout_secs ({}) so provider timeouts can be reported",
                config.provider.timeout_secs
            ),
        ));
    }

    if config.timeouts.request_secs > 0
        && config.simulation.delay_ms >= config.timeouts.request_secs.saturating_mul(1000)
    {
        errors.push(ValidationError::new(
            "simulation.delay_ms",
            format!(
                "must be shorter than timeouts.request_secs ({}s)",
                config.timeouts.request_secs
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.server.bind_address = "not-an-address".into();
        config.provider.url = "ftp://example.com/swap".into();
        config.provider.timeout_secs = 0;
        config.upload.max_file_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"server.bind_address"));
        assert!(fields.contains(&"provider.url"));
        assert!(fields.contains(&"provider.timeout_secs"));
        assert!(fields.contains(&"upload.max_file_bytes"));
    }

    #[test]
    fn test_request_timeout_must_exceed_provider_timeout() {
        let mut config = AppConfig::default();
        config.timeouts.request_secs = 30;
        config.provider.timeout_secs = 30;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timeouts.request_secs");
    }

    #[test]
    fn test_simulation_delay_must_fit_request_timeout() {
        let mut config = AppConfig::default();
        config.provider.timeout_secs = 1;
        config.timeouts.request_secs = 2;
        config.simulation.delay_ms = 3000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "simulation.delay_ms");

        config.simulation.delay_ms = 2000;
        assert!(validate_config(&config).is_err());

        config.simulation.delay_ms = 1999;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
