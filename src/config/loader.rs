//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the provider bearer token.
pub const ENV_API_KEY: &str = "FACESWAP_API_KEY";
/// Environment variable overriding the provider endpoint.
pub const ENV_API_URL: &str = "FACESWAP_API_URL";
/// Environment variable overriding the listening port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable selecting `development` or `production`.
pub const ENV_APP_ENV: &str = "APP_ENV";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: '{value}'")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    let config = apply_env_overrides(config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides through `lookup`, which returns the value of a
/// variable if it is set.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        config.provider.api_key = key;
    }

    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.provider.url = url;
    }

    if let Some(port) = lookup(ENV_PORT) {
        let parsed = port.trim().parse::<u16>().map_err(|_| ConfigError::Env {
            name: ENV_PORT,
            value: port.clone(),
        })?;
        config.server.set_port(parsed);
    }

    if let Some(env) = lookup(ENV_APP_ENV) {
        config.server.environment = Environment::parse(&env).ok_or(ConfigError::Env {
            name: ENV_APP_ENV,
            value: env.clone(),
        })?;
    }

    Ok(config)
}
