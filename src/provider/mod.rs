//! Remote provider subsystem.
//!
//! # Data Flow
//! ```text
//! SwapRequest (two ImageAssets)
//!     → client.rs (multipart re-encode, bearer auth, deadline)
//!     → provider HTTP API
//!     → outcome.rs (classify transport errors and statuses)
//!     → SwapOutcome (consumed by http::response)
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per call; retry policy belongs to the caller
//! - Every failure lands in the closed `FailureKind` set
//! - Config is passed in explicitly so tests can point at mock providers

pub mod client;
pub mod outcome;

pub use client::SwapClient;
pub use outcome::{classify, FailureKind, SwapFailure, SwapOutcome};
