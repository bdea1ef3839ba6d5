//! FaceSwap proxy library.
//!
//! Accepts a `source` face and a `target` scene over HTTP, forwards them to a
//! remote face-swap provider and returns the provider's image, or a canned
//! result from the simulation endpoint.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod provider;
pub mod simulation;
pub mod upload;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
