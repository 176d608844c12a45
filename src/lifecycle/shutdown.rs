//! Shutdown coordination for the gateway.
//!
//! The flag is level-triggered: a listener created after `trigger` still
//! observes it, so the server, the limiter sweep and tests can subscribe in
//! any order.

use tokio::sync::watch;

/// Owner side of the shutdown flag.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for the shutdown flag. Cheap to clone into spawned tasks.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been triggered. Also resolves if the
    /// `Shutdown` owner is dropped.
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
