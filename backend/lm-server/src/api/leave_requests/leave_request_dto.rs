use lm_core::LeaveRequest;

use serde::Serialize;

/// Leave request as returned by the REST API
#[derive(Debug, Serialize)]
pub struct LeaveRequestDto {
    pub id: i64,
    pub employee_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    pub total_days: i64,
    pub reason: String,
    pub status: String,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub created_at: i64,
}

impl From<LeaveRequest> for LeaveRequestDto {
    fn from(r: LeaveRequest) -> Self {
        Self {
            id: r.id,
            employee_id: r.employee_id,
            employee_name: r.employee_name,
            leave_type: r.leave_type,
            start_date: r.start_date.to_string(),
            end_date: r.end_date.to_string(),
            total_days: r.total_days,
            reason: r.reason,
            status: r.status.to_string(),
            approved_by: r.approved_by,
            approved_at: r.approved_at.map(|t| t.timestamp()),
            created_at: r.created_at.timestamp(),
        }
    }
}
