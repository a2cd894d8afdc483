//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handler, config watcher, lifecycle produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID attached to every per-request event
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
