//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events on the request path
//! - Metric updates are cheap (atomic operations); recording with no
//!   exporter installed is a no-op, so tests pay nothing

pub mod logging;
pub mod metrics;
