use crate::{Permission, Role};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    /// Human-facing staff number (e.g. "EMP-0042")
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub position: String,

    pub department_id: Option<i64>,
    pub role_name: Option<String>,
    pub manager_id: Option<i64>,
    pub is_manager: bool,
    pub is_active: bool,

    pub total_leave_days: i64,
    pub remaining_leave_days: i64,

    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn role(&self) -> Option<Role> {
        self.role_name.as_deref().and_then(Role::parse)
    }

    pub fn has_permission(&self, required: Permission) -> bool {
        self.role().is_some_and(|role| role.has_permission(required))
    }
}
