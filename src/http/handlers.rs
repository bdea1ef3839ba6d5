//! Route handlers.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde::Serialize;

use crate::http::request::RequestIdExt;
use crate::http::response::{outcome_response, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::simulation::SimulationResult;
use crate::upload::{receive_swap_request, SwapRequest, UploadError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "FaceSwap API is running",
    })
}

/// `POST /api/swap`: forward the pair to the provider.
pub async fn swap(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let request = read_upload(&state, multipart).await?;

    tracing::info!(request_id = %headers.request_id(), "Forwarding swap to provider");

    let outcome = state.client.swap(&request).await;
    metrics::record_provider_outcome(outcome.label());

    outcome_response(outcome)
}

/// `POST /api/simulate-swap`: demo mode, no provider involved.
pub async fn simulate_swap(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SimulationResult>, ApiError> {
    let request = read_upload(&state, multipart).await?;

    tracing::info!(request_id = %headers.request_id(), "Simulating swap");

    Ok(Json(state.simulator.simulate(&request).await))
}

async fn read_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<SwapRequest, ApiError> {
    let mut multipart = multipart.map_err(|e| UploadError::Malformed(e.body_text()))?;
    let request = receive_swap_request(&mut multipart, &state.config.upload).await?;
    Ok(request)
}
