//! RoboSense LiDAR driver node.
//!
//! Resolves the driver configuration, starts the sensor manager and keeps the
//! process alive until it is interrupted.

pub mod args;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod runtime;
pub mod sensor;

pub use config::Configuration;
pub use lifecycle::{LifecycleController, ShutdownSignal};
pub use sensor::{SensorManager, UdpSensorManager};
