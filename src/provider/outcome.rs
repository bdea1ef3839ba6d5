//! Provider call outcomes and failure classification.

use axum::body::Bytes;
use axum::http::StatusCode;

/// Closed set of ways a provider call can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// DNS resolution or TCP/TLS connect failed.
    NetworkUnreachable,
    /// The provider answered with a non-2xx status.
    ProviderError { status_code: u16 },
    /// The request went out but the connection closed without a response.
    NoResponse,
    /// The exchange did not finish within the configured deadline.
    Timeout,
    /// Anything not covered above.
    Unknown,
}

impl FailureKind {
    /// Stable label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::NetworkUnreachable => "network_unreachable",
            FailureKind::ProviderError { .. } => "provider_error",
            FailureKind::NoResponse => "no_response",
            FailureKind::Timeout => "timeout",
            FailureKind::Unknown => "unknown",
        }
    }
}

/// A classified provider failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapFailure {
    pub kind: FailureKind,
    /// Human-readable text shown to the client.
    pub message: String,
    /// Provider status text or body, for logs only.
    pub provider_detail: Option<String>,
}

impl SwapFailure {
    pub fn network_unreachable() -> Self {
        Self {
            kind: FailureKind::NetworkUnreachable,
            message: "API server not reachable. Please check your connection and try again."
                .to_string(),
            provider_detail: None,
        }
    }

    pub fn no_response() -> Self {
        Self {
            kind: FailureKind::NoResponse,
            message: "No response received from API server".to_string(),
            provider_detail: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: "Request timeout - the API took too long to respond".to_string(),
            provider_detail: None,
        }
    }

    pub fn unknown(raw: impl std::fmt::Display) -> Self {
        Self {
            kind: FailureKind::Unknown,
            message: format!("Unexpected error: {}", raw),
            provider_detail: None,
        }
    }

    /// A non-2xx answer. Short provider bodies are appended to the message.
    pub fn provider_error(status: StatusCode, body: &str) -> Self {
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        let body = body.trim();
        let message = if !body.is_empty() && body.len() <= MAX_INLINE_DETAIL {
            format!("API error: {} {} - {}", status.as_u16(), reason, body)
        } else {
            format!("API error: {} {}", status.as_u16(), reason)
        };

        Self {
            kind: FailureKind::ProviderError {
                status_code: status.as_u16(),
            },
            message,
            provider_detail: Some(truncate(body, MAX_LOGGED_DETAIL)),
        }
    }
}

const MAX_INLINE_DETAIL: usize = 200;
const MAX_LOGGED_DETAIL: usize = 2048;

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Result of one provider call. Lives for a single request.
#[derive(Debug, Clone)]
pub enum SwapOutcome {
    Success { image_bytes: Bytes, content_type: String },
    Failure(SwapFailure),
}

impl SwapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SwapOutcome::Success { .. })
    }

    /// Metrics label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            SwapOutcome::Success { .. } => "success",
            SwapOutcome::Failure(f) => f.kind.label(),
        }
    }
}

/// Map a transport error onto the failure set.
///
/// Timeouts are checked first: reqwest reports a connect timeout as both a
/// timeout and a connect error.
pub fn classify(err: &reqwest::Error) -> SwapFailure {
    if err.is_timeout() {
        SwapFailure::timeout()
    } else if err.is_connect() {
        SwapFailure::network_unreachable()
    } else if err.is_request() || err.is_body() || err.is_decode() {
        SwapFailure::no_response()
    } else {
        SwapFailure::unknown(err)
    }
}
