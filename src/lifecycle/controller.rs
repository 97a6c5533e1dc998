//! Lifecycle controller: start the sensor manager, then park until shutdown.
//!
//! # States
//! ```text
//! Created → Running → ShuttingDown → Stopped
//! ```
//!
//! # State Transitions
//! - Created → Running: interrupt handler registered, manager constructed,
//!   `initialize` and `start` both succeeded
//! - Running → ShuttingDown: the shutdown signal is observed, the wait is
//!   released and the manager is handed back to the caller
//! - ShuttingDown → Stopped: the caller has torn the manager down and calls
//!   [`LifecycleController::finish`]
//!
//! # Design Decisions
//! - Startup failures keep the controller in Created and never reach the wait
//! - The controller does not stop the manager; the caller owns teardown and
//!   reports its completion through `finish`
//! - No timeout on the wait; shutdown is signal driven only

use std::fmt;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::Configuration;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::lifecycle::signals;
use crate::sensor::{SensorError, SensorManager};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Running,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Where shutdown requests come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalMode {
    /// Register SIGINT/SIGTERM handlers that trigger the signal.
    #[default]
    Os,
    /// Leave the signal to the caller (tests, embedding applications).
    Manual,
}

/// Fatal startup failure, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to register interrupt handler: {0}")]
    Signals(#[source] std::io::Error),

    #[error("sensor manager initialization failed: {0}")]
    Initialize(#[source] SensorError),

    #[error("sensor manager start failed: {0}")]
    Start(#[source] SensorError),

    #[error("lifecycle controller is {0}, which does not allow this transition")]
    InvalidState(LifecycleState),
}

impl StartupError {
    /// Short name of the failing stage.
    pub fn stage(&self) -> &'static str {
        match self {
            StartupError::Signals(_) => "signals",
            StartupError::Initialize(_) => "initialize",
            StartupError::Start(_) => "start",
            StartupError::InvalidState(_) => "lifecycle",
        }
    }
}

/// Drives one sensor manager from construction to shutdown.
pub struct LifecycleController {
    shutdown: ShutdownSignal,
    mode: SignalMode,
    state: LifecycleState,
    listener: Option<JoinHandle<()>>,
}

impl LifecycleController {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self {
            shutdown,
            mode: SignalMode::default(),
            state: LifecycleState::Created,
            listener: None,
        }
    }

    pub fn with_signal_mode(mut self, mode: SignalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Start a sensor manager and block until shutdown is signaled.
    ///
    /// On success the started manager is returned so the caller can stop
    /// and release it.
    pub async fn run<M, F>(&mut self, config: &Configuration, factory: F) -> Result<M, StartupError>
    where
        M: SensorManager,
        F: FnOnce() -> M,
    {
        if self.state != LifecycleState::Created {
            return Err(StartupError::InvalidState(self.state));
        }

        if self.mode == SignalMode::Os {
            let listener = signals::install(self.shutdown.clone()).map_err(StartupError::Signals)?;
            self.listener = Some(listener);
        }

        let mut manager = factory();
        manager.initialize(config).map_err(StartupError::Initialize)?;
        manager.start().map_err(StartupError::Start)?;

        self.state = LifecycleState::Running;
        tracing::info!("RoboSense-LiDAR-Driver is running.....");

        self.shutdown.wait().await;

        self.state = LifecycleState::ShuttingDown;
        tracing::debug!(state = %self.state, "Shutdown observed");
        Ok(manager)
    }

    /// Record that teardown of the manager returned by `run` has completed.
    pub fn finish(&mut self) -> Result<(), StartupError> {
        if self.state != LifecycleState::ShuttingDown {
            return Err(StartupError::InvalidState(self.state));
        }
        self.state = LifecycleState::Stopped;
        tracing::debug!(state = %self.state, "Teardown complete");
        Ok(())
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
