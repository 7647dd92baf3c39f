use crate::{CoreError, CoreResult, LeaveStatus};

use std::panic::Location;

use chrono::{DateTime, NaiveDate, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

pub const MAX_REASON_LENGTH: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    /// Joined from employees when listing; absent on freshly created rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,

    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub reason: String,

    pub status: LeaveStatus,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Build a pending request. `total_days` counts both ends of the range.
    #[track_caller]
    pub fn new(
        employee_id: i64,
        leave_type: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
    ) -> CoreResult<Self> {
        if leave_type.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "leave_type cannot be empty".into(),
                field: Some("leave_type".into()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if end_date < start_date {
            return Err(CoreError::Validation {
                message: format!("end_date {end_date} is before start_date {start_date}"),
                field: Some("end_date".into()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if reason.len() > MAX_REASON_LENGTH {
            return Err(CoreError::Validation {
                message: format!("reason exceeds {MAX_REASON_LENGTH} characters"),
                field: Some("reason".into()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            id: 0,
            employee_id,
            employee_name: None,
            leave_type,
            start_date,
            end_date,
            total_days: (end_date - start_date).num_days() + 1,
            reason,
            status: LeaveStatus::Pending,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        })
    }
}
