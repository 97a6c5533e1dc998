//! Single-fire shutdown signal.

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide, single-fire shutdown event.
///
/// Created once in `main`, triggered at most once by the interrupt listener
/// and awaited by the main task. It is never reset; the process exits after
/// the wait returns.
///
/// The flag lives in a watch channel, so a waiter that subscribes after the
/// trigger still sees it set. There is no window for a missed wakeup.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Create an unset signal.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Set the signal.
    ///
    /// Returns `true` for the call that actually set it and `false` for every
    /// later call, which changes nothing and wakes nobody.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    /// Whether the signal has been set.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal is set. Returns immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender is held by `self`, so the channel cannot close here.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
