//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Terminal / log aggregation (stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable from the environment
//! - Metrics are cheap (atomic increments) and recorded unconditionally

pub mod logging;
pub mod metrics;
