//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Runtime params → Pick config path → Resolve config
//!
//! Run (controller.rs):
//!     Register signals → Build manager → initialize → start → wait
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → ShutdownSignal::trigger (once)
//!
//! Shutdown (shutdown.rs):
//!     Single-fire flag shared by the signal listener and the main task
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then signals, then the sensor manager
//! - The signal listener never touches the sensor manager
//! - Teardown runs on the main task after the wait returns

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use controller::{LifecycleController, LifecycleState, SignalMode, StartupError};
pub use shutdown::ShutdownSignal;
