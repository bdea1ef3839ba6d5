//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the face-swap proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and environment settings.
    pub server: ServerConfig,

    /// Remote face-swap provider settings.
    pub provider: ProviderConfig,

    /// Upload size limits.
    pub upload: UploadConfig,

    /// Simulation (demo mode) settings.
    pub simulation: SimulationConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment. Controls error verbosity and log format.
/// Anything not explicitly marked development runs as production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    /// Parse the values accepted in `APP_ENV`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Deployment environment.
    pub environment: Environment,

    /// Directory holding the static frontend (`index.html` at its root).
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            environment: Environment::Production,
            static_dir: "public".to_string(),
        }
    }
}

impl ServerConfig {
    /// Replace the port of `bind_address`, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.bind_address.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.bind_address.clone(),
        };
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// Remote provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Endpoint receiving the multipart swap request.
    pub url: String,

    /// Bearer token sent with every provider call.
    pub api_key: String,

    /// Hard deadline for one provider exchange, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Honour HTTP(S)_PROXY environment variables for provider calls.
    pub system_proxy: bool,

    /// Largest swapped image accepted from the provider, in bytes.
    pub max_response_bytes: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: "https://api.faceswap.dev/v1/swap".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            system_proxy: true,
            max_response_bytes: 32 * 1024 * 1024,
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("system_proxy", &self.system_proxy)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum size of a single uploaded file in bytes.
    pub max_file_bytes: usize,

    /// Allowance for multipart framing on top of the two files.
    pub multipart_overhead_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024, // 10MiB
            multipart_overhead_bytes: 64 * 1024,
        }
    }
}

impl UploadConfig {
    /// Ceiling for a whole upload request: two files plus framing.
    pub fn max_request_bytes(&self) -> usize {
        self.max_file_bytes
            .saturating_mul(2)
            .saturating_add(self.multipart_overhead_bytes)
    }
}

/// Simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Artificial processing delay in milliseconds.
    pub delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time a request may spend in the service, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
