//! Multipart extraction of the `source` / `target` image pair.
//!
//! # Responsibilities
//! - Walk the multipart stream and pick out the two image fields
//! - Enforce the per-file size limit while the field streams in
//! - Reject non-image content types and repeated fields
//!
//! # Design Decisions
//! - A field is never buffered past the limit; the read aborts at the
//!   first chunk that would cross it
//! - Empty files count as missing
//! - Unknown fields are skipped rather than rejected

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use thiserror::Error;

use crate::config::UploadConfig;
use crate::upload::{ImageAsset, SwapRequest};

pub const SOURCE_FIELD: &str = "source";
pub const TARGET_FIELD: &str = "target";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Reasons an upload is refused before any provider call.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Both images are required")]
    MissingImages,

    #[error("Only one file is allowed for field '{0}'")]
    DuplicateField(&'static str),

    #[error("Field '{field}' must be an image, got '{mime}'")]
    InvalidType { field: &'static str, mime: String },

    #[error("File for field '{field}' exceeds the {limit} byte limit")]
    FileTooLarge { field: &'static str, limit: usize },

    #[error("Request body exceeds the upload limit")]
    BodyTooLarge,

    #[error("Malformed multipart request: {0}")]
    Malformed(String),
}

impl UploadError {
    /// Whether the failure is a size violation (413) rather than bad input (400).
    pub fn is_too_large(&self) -> bool {
        matches!(self, UploadError::FileTooLarge { .. } | UploadError::BodyTooLarge)
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::BodyTooLarge
        } else {
            UploadError::Malformed(err.body_text())
        }
    }
}

/// Read the swap image pair out of a multipart request.
pub async fn receive_swap_request(
    multipart: &mut Multipart,
    limits: &UploadConfig,
) -> Result<SwapRequest, UploadError> {
    let mut source: Option<ImageAsset> = None;
    let mut target: Option<ImageAsset> = None;
    let mut seen_source = false;
    let mut seen_target = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let (field_name, slot, seen) = match name.as_str() {
            SOURCE_FIELD => (SOURCE_FIELD, &mut source, &mut seen_source),
            TARGET_FIELD => (TARGET_FIELD, &mut target, &mut seen_target),
            _ => {
                tracing::debug!(field = %name, "Ignoring unexpected multipart field");
                continue;
            }
        };

        if *seen {
            return Err(UploadError::DuplicateField(field_name));
        }
        *seen = true;
        *slot = read_asset(field, field_name, limits.max_file_bytes).await?;
    }

    let request = SwapRequest::from_parts(source, target)?;

    for asset in [&request.source, &request.target] {
        tracing::info!(
            filename = %asset.original_name,
            size_bytes = asset.size_bytes,
            mime = %asset.declared_mime_type,
            "Received image"
        );
    }

    Ok(request)
}

async fn read_asset(
    mut field: Field<'_>,
    field_name: &'static str,
    max_bytes: usize,
) -> Result<Option<ImageAsset>, UploadError> {
    let original_name = field.file_name().unwrap_or(field_name).to_string();
    let declared_mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();

    if field.content_type().is_some() && !is_image_mime(&declared_mime_type) {
        return Err(UploadError::InvalidType {
            field: field_name,
            mime: declared_mime_type,
        });
    }

    let mut buffer = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if buffer.len() + chunk.len() > max_bytes {
            tracing::warn!(
                field = field_name,
                limit = max_bytes,
                "Rejecting oversized upload"
            );
            return Err(UploadError::FileTooLarge {
                field: field_name,
                limit: max_bytes,
            });
        }
        buffer.extend_from_slice(&chunk);
    }

    if buffer.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageAsset::new(
        Bytes::from(buffer),
        declared_mime_type,
        original_name,
    )))
}

fn is_image_mime(mime: &str) -> bool {
    mime.get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
        .unwrap_or(false)
}
