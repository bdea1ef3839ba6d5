//! Early rejection of oversized uploads.
//! Refuses requests whose declared length exceeds the upload ceiling before
//! the handler reads any of the body.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::upload::UploadError;

pub async fn body_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.config.upload.max_request_bytes();

    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    if let Some(length) = declared {
        if length > limit {
            tracing::warn!(
                content_length = length,
                limit,
                path = %req.uri().path(),
                "Rejecting request over the upload limit"
            );
            return ApiError::from(UploadError::BodyTooLarge).into_response();
        }
    }

    next.run(req).await
}
