//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, panic capture, limits)
//! - Serve the static frontend
//! - Bind server to listener and shut down gracefully

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, get_service, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::middleware::{body_limit_middleware, handle_timeout_error, JsonPanicResponder};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::provider::SwapClient;
use crate::simulation::Simulator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: SwapClient,
    pub simulator: Simulator,
}

/// HTTP server for the face-swap proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let state = AppState {
            client: SwapClient::new(&config.provider)?,
            simulator: Simulator::new(&config.simulation),
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let static_dir = PathBuf::from(&config.server.static_dir);

        let api = Router::new()
            .route("/api/swap", post(handlers::swap))
            .route("/api/simulate-swap", post(handlers::simulate_swap))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                body_limit_middleware,
            ))
            .layer(DefaultBodyLimit::max(config.upload.max_request_bytes()));

        Router::new()
            .route("/health", get(handlers::health))
            .route("/", get_service(ServeFile::new(static_dir.join("index.html"))))
            .merge(api)
            .fallback_service(ServeDir::new(static_dir))
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(CatchPanicLayer::custom(JsonPanicResponder {
                        expose_details: config.server.environment.is_development(),
                    }))
                    .layer(HandleErrorLayer::new(handle_timeout_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            provider_url = %self.config.provider.url,
            environment = ?self.config.server.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary-7MA4YWxk";

    fn server() -> HttpServer {
        let mut config = AppConfig::default();
        config.provider.system_proxy = false;
        config.simulation.delay_ms = 0;
        HttpServer::new(config).unwrap()
    }

    fn multipart(parts: &[(&str, Option<&str>, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, mime, bytes) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match file_name {
                Some(f) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, f
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", name),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn post(path: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = server()
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_duplicate_field_rejected() {
        let body = multipart(&[
            ("source", Some("a.jpg"), "image/jpeg", b"aaaa".as_slice()),
            ("source", Some("b.jpg"), "image/jpeg", b"bbbb".as_slice()),
            ("target", Some("c.jpg"), "image/jpeg", b"cccc".as_slice()),
        ]);
        let response = server()
            .router()
            .oneshot(post("/api/simulate-swap", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Only one file is allowed for field 'source'");
    }

    #[tokio::test]
    async fn test_unknown_fields_are_ignored() {
        let body = multipart(&[
            ("note", None, "text/plain", b"hello".as_slice()),
            ("source", Some("a.jpg"), "image/jpeg", b"aaaa".as_slice()),
            ("target", Some("c.jpg"), "image/jpeg", b"cccc".as_slice()),
        ]);
        let response = server()
            .router()
            .oneshot(post("/api/simulate-swap", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["simulation"], true);
    }

    #[tokio::test]
    async fn test_overall_timeout_renders_json() {
        let mut config = AppConfig::default();
        config.provider.system_proxy = false;
        config.simulation.delay_ms = 1500;
        config.timeouts.request_secs = 1;
        let server = HttpServer::new(config).unwrap();

        let body = multipart(&[
            ("source", Some("a.jpg"), "image/jpeg", b"aaaa".as_slice()),
            ("target", Some("c.jpg"), "image/jpeg", b"cccc".as_slice()),
        ]);
        let response = server
            .router()
            .oneshot(post("/api/simulate-swap", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key("x-request-id"));
        let json = json_body(response).await;
        assert_eq!(json["error"], true);
        assert_eq!(json["message"], crate::http::response::REQUEST_TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_get_on_swap_is_rejected() {
        let response = server()
            .router()
            .oneshot(Request::get("/api/swap").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
