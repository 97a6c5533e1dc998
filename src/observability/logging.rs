//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at process start
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log level from `RUST_LOG`, defaulting to info for this crate

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "rslidar_node=info";

/// Install the global subscriber. Later calls are ignored.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
