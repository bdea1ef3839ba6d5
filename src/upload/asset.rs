//! In-memory image assets produced from one upload.

use axum::body::Bytes;

use crate::upload::UploadError;

/// One uploaded image, owned by the request that received it.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub bytes: Bytes,
    /// Content type declared by the client, not verified against the bytes.
    pub declared_mime_type: String,
    pub original_name: String,
    pub size_bytes: usize,
}

impl ImageAsset {
    pub fn new(
        bytes: Bytes,
        declared_mime_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        let size_bytes = bytes.len();
        Self {
            bytes,
            declared_mime_type: declared_mime_type.into(),
            original_name: original_name.into(),
            size_bytes,
        }
    }
}

/// The pair of images a swap operates on.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub source: ImageAsset,
    pub target: ImageAsset,
}

impl SwapRequest {
    /// Build a request, failing when either image is absent.
    pub fn from_parts(
        source: Option<ImageAsset>,
        target: Option<ImageAsset>,
    ) -> Result<Self, UploadError> {
        match (source, target) {
            (Some(source), Some(target)) => Ok(Self { source, target }),
            _ => Err(UploadError::MissingImages),
        }
    }
}
