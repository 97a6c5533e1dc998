//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! Consumers:
//!     → fmt layer on stdout, filtered by RUST_LOG
//! ```

pub mod logging;
