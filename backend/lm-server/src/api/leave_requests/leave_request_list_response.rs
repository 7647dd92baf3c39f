use crate::LeaveRequestDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LeaveRequestListResponse {
    pub leave_requests: Vec<LeaveRequestDto>,
}
