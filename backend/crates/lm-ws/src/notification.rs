use crate::{Audience, Result as WsErrorResult};

use std::fmt;

use axum::extract::ws::Message;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};

pub const KIND_NEW_LEAVE_REQUEST: &str = "new_leave_request";
pub const KIND_LEAVE_APPROVED: &str = "leave_approved";
pub const KIND_LEAVE_REJECTED: &str = "leave_rejected";

/// Wire `type` of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    NewLeaveRequest,
    LeaveApproved,
    LeaveRejected,
    /// Caller-supplied type for generic manager broadcasts
    Custom(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NewLeaveRequest => KIND_NEW_LEAVE_REQUEST,
            Self::LeaveApproved => KIND_LEAVE_APPROVED,
            Self::LeaveRejected => KIND_LEAVE_REJECTED,
            Self::Custom(kind) => kind,
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(value: &str) -> Self {
        match value {
            KIND_NEW_LEAVE_REQUEST => Self::NewLeaveRequest,
            KIND_LEAVE_APPROVED => Self::LeaveApproved,
            KIND_LEAVE_REJECTED => Self::LeaveRejected,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NotificationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(NotificationKind::from(value.as_str()))
    }
}

/// Server-to-client message.
///
/// Serializes as `{"type", "message", "data", "for_manager", "target_id"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub data: Value,
    pub for_manager: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
}

impl Notification {
    /// Department-scoped announcement of a freshly filed request
    pub fn new_leave_request(
        employee_name: &str,
        leave_type: &str,
        start_date: &str,
        end_date: &str,
        reason: &str,
        department_id: i64,
    ) -> Self {
        Self {
            kind: NotificationKind::NewLeaveRequest,
            message: format!("New leave request from {employee_name}"),
            data: json!({
                "employee_name": employee_name,
                "leave_type": leave_type,
                "start_date": start_date,
                "end_date": end_date,
                "reason": reason,
                "department_id": department_id,
                "timestamp": rfc3339(Utc::now()),
            }),
            for_manager: true,
            target_id: None,
        }
    }

    /// Decision notice for the employee who filed the request.
    ///
    /// `"rejected"` yields a rejection; any other status is reported as approved.
    pub fn leave_status_change(
        employee_name: &str,
        status: &str,
        leave_type: &str,
        employee_id: i64,
    ) -> Self {
        let (kind, verb) = if status == "rejected" {
            (NotificationKind::LeaveRejected, "rejected")
        } else {
            (NotificationKind::LeaveApproved, "approved")
        };

        Self {
            kind,
            message: format!("Your {leave_type} leave request has been {verb}"),
            data: json!({
                "employee_name": employee_name,
                "leave_type": leave_type,
                "status": status,
                "timestamp": rfc3339(Utc::now()),
            }),
            for_manager: false,
            target_id: Some(employee_id),
        }
    }

    /// Caller-defined message for every manager endpoint
    pub fn manager_broadcast(
        kind: impl Into<NotificationKind>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            data,
            for_manager: true,
            target_id: None,
        }
    }

    pub fn audience(&self) -> Audience {
        Audience {
            for_manager: self.for_manager,
            target_id: self.target_id,
        }
    }

    /// Serialize once into a text frame shared by every recipient
    #[track_caller]
    pub fn to_message(&self) -> WsErrorResult<Message> {
        let text = serde_json::to_string(self)?;
        Ok(Message::Text(text.into()))
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
