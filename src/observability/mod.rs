//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached by middleware and propagated to responses
//! - Metrics are cheap (atomic increments)
//! - Metrics exposition is optional and off the request path

pub mod logging;
pub mod metrics;
