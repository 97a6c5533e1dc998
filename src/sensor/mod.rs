//! Sensor-management subsystem.
//!
//! # Responsibilities
//! - Define the contract the lifecycle controller drives
//! - Own all device I/O once started
//!
//! # Design Decisions
//! - Two-call startup: `initialize` validates and prepares, `start` opens I/O
//! - `stop` is idempotent and never fails; it runs on the main task after
//!   shutdown has been observed
//! - Semantic validation of the configuration happens here, not in the
//!   resolver

pub mod udp;

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::config::Configuration;

pub use udp::UdpSensorManager;

/// Errors surfaced by a sensor manager.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("configuration does not match the driver schema: {0}")]
    Schema(#[from] serde_yaml::Error),

    #[error("invalid driver configuration: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("unsupported configuration: {0}")]
    Unsupported(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("sensor manager has not been initialized")]
    NotInitialized,

    #[error("sensor manager is already started")]
    AlreadyStarted,

    #[error("sensor manager has been stopped and cannot be restarted")]
    Stopped,
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Contract between the lifecycle controller and the sensor subsystem.
pub trait SensorManager: Send {
    /// Prepare the subsystem from the resolved configuration.
    fn initialize(&mut self, config: &Configuration) -> Result<(), SensorError>;

    /// Begin device I/O. Only valid after a successful `initialize` and
    /// before `stop`.
    fn start(&mut self) -> Result<(), SensorError>;

    /// Stop all device I/O. Calling it more than once is harmless; once
    /// called, the manager cannot be started again.
    fn stop(&mut self);
}
