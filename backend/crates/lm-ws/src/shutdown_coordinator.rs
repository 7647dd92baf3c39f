use crate::ShutdownGuard;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Fans a single shutdown signal out to every endpoint and dispatch worker.
///
/// The signal is latched, so guards taken after `shutdown()` resolve immediately.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            shutdown_tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown; repeated calls are no-ops
    pub fn shutdown(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return;
        }
        log::info!("Shutdown signal received, closing endpoints and dispatch workers");
        // No receivers just means nothing is running yet
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutting_down(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn subscribe_guard(&self) -> ShutdownGuard {
        ShutdownGuard::new(self.subscribe(), Arc::clone(&self.triggered))
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
