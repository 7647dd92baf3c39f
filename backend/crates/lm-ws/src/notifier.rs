use crate::{
    ConnectionInfo, ConnectionRegistry, DeliveryReport, DepartmentLookup, DispatchJob, Metrics,
    Notification, NotificationKind, Result as WsErrorResult,
};

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use log::{debug, error, warn};
use serde::Serialize;
use serde_json::Value;

/// Resolves audiences against live membership and fans notifications out
#[derive(Clone)]
pub struct Notifier {
    registry: ConnectionRegistry,
    departments: Arc<dyn DepartmentLookup>,
    metrics: Metrics,
}

/// One connected endpoint as reported by the diagnostics summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedClient {
    pub id: i64,
    pub is_manager: bool,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientsSummary {
    pub total_clients: usize,
    pub managers: Vec<ConnectedClient>,
    pub employees: Vec<ConnectedClient>,
    pub manager_count: usize,
    pub employee_count: usize,
}

impl Notifier {
    pub fn new(
        registry: ConnectionRegistry,
        departments: Arc<dyn DepartmentLookup>,
        metrics: Metrics,
    ) -> Self {
        Self {
            registry,
            departments,
            metrics,
        }
    }

    /// Deliver by role and optional target identity
    pub async fn dispatch(&self, notification: &Notification) -> WsErrorResult<DeliveryReport> {
        let message = self.serialize(notification)?;
        let audience = notification.audience();

        let report = self
            .registry
            .send_where(message, |endpoint| audience.admits(endpoint))
            .await;

        self.record(notification, report);
        Ok(report)
    }

    /// Announce a new request to the managers of `department_id`.
    ///
    /// Each manager's department is looked up live, outside the registry lock. A failed
    /// lookup skips that manager only.
    pub async fn notify_new_leave_request(
        &self,
        employee_name: &str,
        leave_type: &str,
        start_date: &str,
        end_date: &str,
        reason: &str,
        department_id: i64,
    ) -> WsErrorResult<DeliveryReport> {
        let notification = Notification::new_leave_request(
            employee_name,
            leave_type,
            start_date,
            end_date,
            reason,
            department_id,
        );
        let message = self.serialize(&notification)?;

        let managers: Vec<ConnectionInfo> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .filter(|endpoint| endpoint.is_manager)
            .collect();

        // One lookup per employee per event, even with several open tabs
        let mut resolved: HashMap<i64, Option<i64>> = HashMap::new();
        let mut recipients = Vec::new();

        for manager in &managers {
            let department = match resolved.get(&manager.employee_id) {
                Some(department) => *department,
                None => {
                    let department = match self.departments.department_of(manager.employee_id).await
                    {
                        Ok(department) => Some(department),
                        Err(e) => {
                            warn!(
                                "Skipping manager {} for new leave request: {e}",
                                manager.employee_id
                            );
                            self.metrics.department_lookup_failed();
                            None
                        }
                    };
                    resolved.insert(manager.employee_id, department);
                    department
                }
            };

            if department == Some(department_id) {
                recipients.push(manager.connection_id);
            }
        }

        let report = self.registry.send_to(&recipients, message).await;
        debug!(
            "New leave request from {employee_name} reached {} of {} manager endpoints in department {department_id}",
            report.delivered,
            managers.len()
        );

        self.record(&notification, report);
        Ok(report)
    }

    /// Tell the requesting employee about a decision
    pub async fn notify_leave_status_change(
        &self,
        employee_name: &str,
        status: &str,
        leave_type: &str,
        employee_id: i64,
    ) -> WsErrorResult<DeliveryReport> {
        let notification =
            Notification::leave_status_change(employee_name, status, leave_type, employee_id);
        self.dispatch(&notification).await
    }

    /// Send a caller-defined message to every manager endpoint
    pub async fn broadcast_to_managers(
        &self,
        kind: impl Into<NotificationKind>,
        message: impl Into<String>,
        data: Value,
    ) -> WsErrorResult<DeliveryReport> {
        let notification = Notification::manager_broadcast(kind, message, data);
        self.dispatch(&notification).await
    }

    pub async fn connected_clients_summary(&self) -> ClientsSummary {
        let mut endpoints = self.registry.snapshot().await;
        endpoints.sort_by_key(|e| (e.employee_id, e.connected_at));

        let (managers, employees): (Vec<_>, Vec<_>) = endpoints
            .into_iter()
            .map(|e| ConnectedClient {
                id: e.employee_id,
                is_manager: e.is_manager,
                connected: true,
            })
            .partition(|c| c.is_manager);

        ClientsSummary {
            total_clients: managers.len() + employees.len(),
            manager_count: managers.len(),
            employee_count: employees.len(),
            managers,
            employees,
        }
    }

    /// Execute a queued job
    pub async fn run(&self, job: DispatchJob) -> WsErrorResult<DeliveryReport> {
        match job {
            DispatchJob::NewLeaveRequest {
                employee_name,
                leave_type,
                start_date,
                end_date,
                reason,
                department_id,
            } => {
                self.notify_new_leave_request(
                    &employee_name,
                    &leave_type,
                    &start_date,
                    &end_date,
                    &reason,
                    department_id,
                )
                .await
            }
            DispatchJob::LeaveStatusChange {
                employee_name,
                status,
                leave_type,
                employee_id,
            } => {
                self.notify_leave_status_change(&employee_name, &status, &leave_type, employee_id)
                    .await
            }
            DispatchJob::ManagerBroadcast {
                kind,
                message,
                data,
            } => self.broadcast_to_managers(kind, message, data).await,
        }
    }

    fn serialize(&self, notification: &Notification) -> WsErrorResult<Message> {
        notification.to_message().inspect_err(|e| {
            error!("Dropping {} notification: {e}", notification.kind);
            self.metrics.serialization_failed();
        })
    }

    fn record(&self, notification: &Notification, report: DeliveryReport) {
        self.metrics
            .notification_dispatched(notification.kind.as_str(), report.delivered);
        self.metrics.slow_clients_dropped(report.dropped);
    }
}
