use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateLeaveStatusRequest {
    /// "approved" or "rejected"
    pub status: String,
}
