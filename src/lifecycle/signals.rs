//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT (and SIGTERM on unix)
//! - Translate a delivered signal into a [`ShutdownSignal`] trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling: the OS-level handler only wakes a task,
//!   and the task runs in ordinary async context
//! - The listener logs and triggers, nothing else; teardown happens on the
//!   main task after its wait returns
//! - Handlers are registered before this function returns, so a signal that
//!   arrives during sensor startup is not lost
//! - Repeated signals are logged and ignored

use std::io;

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::ShutdownSignal;

/// Register the interrupt handlers and spawn the listener task.
///
/// Must be called from within a Tokio runtime.
#[cfg(unix)]
pub fn install(shutdown: ShutdownSignal) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                received = interrupt.recv() => match received {
                    Some(()) => "SIGINT",
                    None => break,
                },
                received = terminate.recv() => match received {
                    Some(()) => "SIGTERM",
                    None => break,
                },
            };
            on_signal(&shutdown, name);
        }
    }))
}

/// Register the interrupt handler and spawn the listener task.
///
/// Must be called from within a Tokio runtime.
#[cfg(not(unix))]
pub fn install(shutdown: ShutdownSignal) -> io::Result<JoinHandle<()>> {
    let mut interrupt = tokio::signal::windows::ctrl_c()?;

    Ok(tokio::spawn(async move {
        while interrupt.recv().await.is_some() {
            on_signal(&shutdown, "CTRL_C");
        }
    }))
}

fn on_signal(shutdown: &ShutdownSignal, name: &'static str) {
    if shutdown.trigger() {
        tracing::info!(signal = name, "RoboSense-LiDAR-Driver is stopping.....");
    } else {
        tracing::debug!(signal = name, "Shutdown already in progress, ignoring signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_delivery_triggers_once() {
        let shutdown = ShutdownSignal::new();
        on_signal(&shutdown, "SIGINT");
        on_signal(&shutdown, "SIGINT");
        on_signal(&shutdown, "SIGTERM");
        assert!(shutdown.is_triggered());
        assert!(!shutdown.trigger());
    }

    #[tokio::test]
    async fn install_does_not_fire_by_itself() {
        let shutdown = ShutdownSignal::new();
        let listener = install(shutdown.clone()).unwrap();
        tokio::task::yield_now().await;
        assert!(!shutdown.is_triggered());
        listener.abort();
    }
}
