//! Upload receiving subsystem.
//!
//! # Data Flow
//! ```text
//! POST multipart body (bounded by the body limit layer)
//!     → receiver.rs (field walk, per-file limit, type check)
//!     → asset.rs (ImageAsset, SwapRequest)
//!     → provider client or simulation
//! ```

pub mod asset;
pub mod receiver;

pub use asset::{ImageAsset, SwapRequest};
pub use receiver::{receive_swap_request, UploadError, SOURCE_FIELD, TARGET_FIELD};
