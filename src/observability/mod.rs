//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: tx_hash, token_id, reason, ...)
//!     → metrics.rs counters
//!
//! Consumers:
//!     → logging.rs fmt subscriber on stdout
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
