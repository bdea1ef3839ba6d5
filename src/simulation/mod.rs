//! Simulation (demo mode) subsystem.
//!
//! Stands in for the provider when it is unavailable: waits a fixed delay
//! and answers with a constant placeholder image. Never touches the network.

use std::sync::OnceLock;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::upload::SwapRequest;

const PLACEHOLDER_JPEG: &[u8] = include_bytes!("../../assets/placeholder.jpg");

pub const SIMULATION_MESSAGE: &str = "Simulation complete - Using demo mode";

/// Payload returned by the simulation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub success: bool,
    pub message: &'static str,
    pub simulation: bool,
    pub image_url: &'static str,
}

/// Data URI of the placeholder JPEG, encoded once.
pub fn placeholder_data_uri() -> &'static str {
    static URI: OnceLock<String> = OnceLock::new();
    URI.get_or_init(|| {
        format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(PLACEHOLDER_JPEG)
        )
    })
}

/// Fake a swap of `request` after the configured delay.
#[derive(Debug, Clone)]
pub struct Simulator {
    delay: Duration,
}

impl Simulator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn simulate(&self, request: &SwapRequest) -> SimulationResult {
        tracing::info!(
            source = %request.source.original_name,
            target = %request.target.original_name,
            delay_ms = self.delay.as_millis() as u64,
            "Running simulated swap"
        );

        tokio::time::sleep(self.delay).await;

        SimulationResult {
            success: true,
            message: SIMULATION_MESSAGE,
            simulation: true,
            image_url: placeholder_data_uri(),
        }
    }
}
