//! Response mapping.
//!
//! # Responsibilities
//! - Turn a `SwapOutcome` into the client-facing response
//! - Render every failure as the JSON error shape `{error: true, message, ...}`
//! - Hide internal details outside development mode
//!
//! # Design Decisions
//! - Successful swaps stream the provider bytes through untouched
//! - Provider failures advertise the simulation endpoint but never call it

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::provider::{SwapFailure, SwapOutcome};
use crate::upload::UploadError;

pub const RESULT_DISPOSITION: &str = "attachment; filename=\"faceswap-result.jpg\"";
pub const FALLBACK_HINT: &str = "Using simulation mode due to API error";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const REQUEST_TIMEOUT_MESSAGE: &str = "Request timeout - the server took too long to respond";

/// JSON body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            simulation: None,
            fallback: None,
            details: None,
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("{}", .0.message)]
    Provider(SwapFailure),

    #[error("{}", REQUEST_TIMEOUT_MESSAGE)]
    RequestTimeout,

    #[error("Internal server error")]
    Internal {
        /// Shown only in development mode.
        details: Option<String>,
    },
}

impl ApiError {
    /// Internal error carrying `cause` when details may be exposed.
    pub fn internal(cause: impl std::fmt::Display, expose_details: bool) -> Self {
        ApiError::Internal {
            details: expose_details.then(|| cause.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(e) if e.is_too_large() => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Provider(_) | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Upload(e) => ErrorBody::new(e.to_string()),
            ApiError::Provider(failure) => ErrorBody {
                simulation: Some(true),
                fallback: Some(FALLBACK_HINT),
                ..ErrorBody::new(failure.message)
            },
            ApiError::RequestTimeout => ErrorBody::new(REQUEST_TIMEOUT_MESSAGE),
            ApiError::Internal { details } => ErrorBody {
                details,
                ..ErrorBody::new(INTERNAL_ERROR_MESSAGE)
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Build the final response for a provider outcome.
pub fn outcome_response(outcome: SwapOutcome) -> Result<Response, ApiError> {
    match outcome {
        SwapOutcome::Success {
            image_bytes,
            content_type,
        } => {
            let content_type = HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("image/jpeg"));
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (
                        header::CONTENT_DISPOSITION,
                        HeaderValue::from_static(RESULT_DISPOSITION),
                    ),
                ],
                Body::from(image_bytes),
            )
                .into_response())
        }
        SwapOutcome::Failure(failure) => Err(ApiError::Provider(failure)),
    }
}
