use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateLeaveRequest {
    /// e.g. "annual", "sick"
    pub leave_type: String,

    /// `YYYY-MM-DD`
    pub start_date: NaiveDate,

    /// `YYYY-MM-DD`, inclusive
    pub end_date: NaiveDate,

    #[serde(default)]
    pub reason: String,
}
