use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Per-task handle on the shutdown signal, from [`crate::ShutdownCoordinator::subscribe_guard`]
pub struct ShutdownGuard {
    shutdown_rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownGuard {
    pub(crate) fn new(shutdown_rx: broadcast::Receiver<()>, triggered: Arc<AtomicBool>) -> Self {
        Self {
            shutdown_rx,
            triggered,
        }
    }

    /// Resolves once shutdown is triggered or the coordinator is gone
    pub async fn wait(&mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_rx.recv().await;
    }
}
