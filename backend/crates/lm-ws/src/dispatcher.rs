use crate::{Notifier, NotificationKind, ShutdownCoordinator, ShutdownGuard};

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

/// Work item for the background dispatch pool
#[derive(Debug, Clone)]
pub enum DispatchJob {
    NewLeaveRequest {
        employee_name: String,
        leave_type: String,
        start_date: String,
        end_date: String,
        reason: String,
        department_id: i64,
    },
    LeaveStatusChange {
        employee_name: String,
        status: String,
        leave_type: String,
        employee_id: i64,
    },
    ManagerBroadcast {
        kind: NotificationKind,
        message: String,
        data: Value,
    },
}

impl DispatchJob {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewLeaveRequest { .. } => "new_leave_request",
            Self::LeaveStatusChange { .. } => "leave_status_change",
            Self::ManagerBroadcast { .. } => "manager_broadcast",
        }
    }
}

/// Fire-and-forget front of the [`Notifier`].
///
/// Jobs go on an unbounded queue drained by a fixed pool of worker tasks, so callers
/// never wait on lookups or fan-out.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<DispatchJob>,
}

type SharedReceiver = Arc<Mutex<mpsc::UnboundedReceiver<DispatchJob>>>;

impl NotificationDispatcher {
    /// Start `worker_count` workers (at least one). Must be called inside a tokio runtime.
    pub fn spawn(notifier: Notifier, worker_count: usize, shutdown: &ShutdownCoordinator) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let rx: SharedReceiver = Arc::new(Mutex::new(rx));
        let worker_count = worker_count.max(1);

        for worker_id in 0..worker_count {
            tokio::spawn(Self::run_worker(
                worker_id,
                notifier.clone(),
                Arc::clone(&rx),
                shutdown.subscribe_guard(),
            ));
        }

        info!("Notification dispatcher started with {worker_count} workers");
        Self { tx }
    }

    pub fn submit(&self, job: DispatchJob) {
        if let Err(rejected) = self.tx.send(job) {
            warn!(
                "Notification dispatcher stopped, dropping {} job",
                rejected.0.label()
            );
        }
    }

    async fn run_worker(
        worker_id: usize,
        notifier: Notifier,
        rx: SharedReceiver,
        mut shutdown: ShutdownGuard,
    ) {
        loop {
            let next = tokio::select! {
                job = Self::next_job(&rx) => job,
                _ = shutdown.wait() => {
                    debug!("Dispatch worker {worker_id} stopping on shutdown");
                    break;
                }
            };

            let Some(job) = next else {
                debug!("Dispatch worker {worker_id} stopping, queue closed");
                break;
            };

            let label = job.label();
            match notifier.run(job).await {
                Ok(report) => debug!(
                    "Worker {worker_id} dispatched {label}: {} delivered, {} dropped",
                    report.delivered, report.dropped
                ),
                Err(e) => error!("Worker {worker_id} failed to dispatch {label}: {e}"),
            }
        }
    }

    async fn next_job(rx: &SharedReceiver) -> Option<DispatchJob> {
        rx.lock().await.recv().await
    }
}
