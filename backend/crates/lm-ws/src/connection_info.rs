use crate::ConnectionId;

use lm_auth::EmployeeContext;

use chrono::{DateTime, Utc};

/// Identity of a live endpoint, fixed for the connection's lifetime
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    pub employee_id: i64,
    pub is_manager: bool,
    pub role_name: String,
    /// Department claimed by the token; delivery re-resolves it live
    pub department_claim: Option<i64>,
    pub connected_at: DateTime<Utc>,
}

impl ConnectionInfo {
    pub fn new(connection_id: ConnectionId, employee: EmployeeContext) -> Self {
        Self {
            connection_id,
            employee_id: employee.employee_id,
            is_manager: employee.is_manager,
            role_name: employee.role_name,
            department_claim: employee.department_id,
            connected_at: Utc::now(),
        }
    }
}
