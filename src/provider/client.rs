//! Remote face-swap provider client.
//!
//! # Responsibilities
//! - Re-encode the uploaded pair as the provider's multipart request
//! - Authenticate with the configured bearer token
//! - Bound the whole exchange with the configured deadline
//! - Classify every failure into a `FailureKind`

use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use tokio::time::timeout;

use crate::config::ProviderConfig;
use crate::provider::outcome::{classify, SwapFailure, SwapOutcome};
use crate::upload::{ImageAsset, SwapRequest, SOURCE_FIELD, TARGET_FIELD};

/// Content type every forwarded part is labelled with.
pub const FORWARDED_MIME: &str = "image/jpeg";

/// How much of a provider error body is read for diagnostics.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Client for the face-swap provider.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SwapClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    timeout_duration: Duration,
    max_response_bytes: usize,
}

impl SwapClient {
    /// Create a client from the provider configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let timeout_duration = Duration::from_secs(config.timeout_secs);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(timeout_duration);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        if config.api_key.is_empty() {
            tracing::warn!("Provider API key is not set; swap requests will likely be rejected");
        }

        Ok(Self {
            http: builder.build()?,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            timeout_duration,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Send one swap request. Never retries.
    pub async fn swap(&self, request: &SwapRequest) -> SwapOutcome {
        let outcome = match timeout(self.timeout_duration, self.exchange(request)).await {
            Ok(outcome) => outcome,
            Err(_) => SwapOutcome::Failure(SwapFailure::timeout()),
        };

        match &outcome {
            SwapOutcome::Success { image_bytes, content_type } => {
                tracing::info!(
                    size_bytes = image_bytes.len(),
                    content_type = %content_type,
                    "Provider returned swapped image"
                );
            }
            SwapOutcome::Failure(failure) => {
                tracing::error!(
                    kind = failure.kind.label(),
                    message = %failure.message,
                    detail = failure.provider_detail.as_deref().unwrap_or(""),
                    "Provider call failed"
                );
            }
        }

        outcome
    }

    async fn exchange(&self, request: &SwapRequest) -> SwapOutcome {
        let form = match build_form(request) {
            Ok(form) => form,
            Err(e) => return SwapOutcome::Failure(SwapFailure::unknown(e)),
        };

        tracing::debug!(url = %self.url, "Sending swap request to provider");

        let response = match self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, FORWARDED_MIME)
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SwapOutcome::Failure(classify(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = match read_limited(response, ERROR_BODY_LIMIT).await {
                Ok(LimitedBody::Complete(bytes)) | Ok(LimitedBody::Truncated(bytes)) => {
                    String::from_utf8_lossy(&bytes).into_owned()
                }
                Err(_) => String::new(),
            };
            return SwapOutcome::Failure(SwapFailure::provider_error(status, &body));
        }

        if response.content_length().is_some_and(|len| len > self.max_response_bytes as u64) {
            return SwapOutcome::Failure(self.oversized_response());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(FORWARDED_MIME)
            .to_string();

        match read_limited(response, self.max_response_bytes).await {
            Ok(LimitedBody::Complete(bytes)) => SwapOutcome::Success {
                image_bytes: Bytes::from(bytes),
                content_type,
            },
            Ok(LimitedBody::Truncated(_)) => SwapOutcome::Failure(self.oversized_response()),
            Err(e) => SwapOutcome::Failure(classify(&e)),
        }
    }

    fn oversized_response(&self) -> SwapFailure {
        SwapFailure::unknown(format!("provider response exceeds {} bytes", self.max_response_bytes))
    }
}

enum LimitedBody {
    Complete(Vec<u8>),
    /// The body was longer than the limit; holds the first `limit` bytes.
    Truncated(Vec<u8>),
}

/// Read at most `limit` bytes of the response body.
async fn read_limited(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<LimitedBody, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            return Ok(LimitedBody::Truncated(body));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(LimitedBody::Complete(body))
}

impl std::fmt::Debug for SwapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapClient")
            .field("url", &self.url)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

fn build_form(request: &SwapRequest) -> Result<Form, reqwest::Error> {
    Ok(Form::new()
        .part(SOURCE_FIELD, jpeg_part(&request.source, "source.jpg")?)
        .part(TARGET_FIELD, jpeg_part(&request.target, "target.jpg")?))
}

fn jpeg_part(asset: &ImageAsset, file_name: &'static str) -> Result<Part, reqwest::Error> {
    Part::bytes(asset.bytes.to_vec())
        .file_name(file_name)
        .mime_str(FORWARDED_MIME)
}
