//! Conversion of handler panics into the JSON internal-error response.

use std::any::Any;

use axum::{body::Body, http::Response, response::IntoResponse};
use tower_http::catch_panic::ResponseForPanic;

use crate::http::response::ApiError;

/// Renders a caught panic as `{error: true, message: "Internal server error"}`,
/// with the panic text in `details` when `expose_details` is set.
#[derive(Debug, Clone, Copy)]
pub struct JsonPanicResponder {
    pub expose_details: bool,
}

impl ResponseForPanic for JsonPanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> Response<Self::ResponseBody> {
        let cause = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };

        tracing::error!(cause = %cause, "Handler panicked");
        ApiError::internal(cause, self.expose_details).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_panic_payload_in_development() {
        let mut responder = JsonPanicResponder { expose_details: true };
        let response = responder.response_for_panic(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["details"], "kaboom");
    }

    #[tokio::test]
    async fn test_panic_payload_hidden_in_production() {
        let mut responder = JsonPanicResponder { expose_details: false };
        let response = responder.response_for_panic(Box::new(String::from("secret")));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("details").is_none());
    }
}
