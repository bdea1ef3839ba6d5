//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the provider client produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (human or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the trace layer and handler logs
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
