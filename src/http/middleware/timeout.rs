//! Conversion of overall request-timeout errors into the JSON error shape.

use axum::BoxError;
use tower::timeout::error::Elapsed;

use crate::http::response::ApiError;

/// Error handler for the `tower::timeout` layer wrapping the router.
pub async fn handle_timeout_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded the overall timeout");
        ApiError::RequestTimeout
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal(err, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_elapsed_maps_to_request_timeout() {
        let err = handle_timeout_error(Box::new(Elapsed::new())).await;
        assert!(matches!(err, ApiError::RequestTimeout));
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_other_errors_are_internal() {
        let err = handle_timeout_error("broken pipe".into()).await;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
