use crate::Permission;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// Parse a role name as stored in the roles table.
    /// Comparison ignores case and surrounding whitespace; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    pub fn has_permission(&self, required: Permission) -> bool {
        use Permission::*;

        matches!(
            (self, required),
            (Self::SuperAdmin, _)
                | (Self::Admin, UsersRead | UsersWrite | ReportsRead | LeaveApprove)
                | (Self::Manager, UsersRead | LeaveApprove | ReportsRead)
                | (Self::Employee, LeaveRead | LeaveWrite)
        )
    }

    /// Permission check straight from a role name, as carried in a token
    pub fn name_has_permission(role_name: &str, required: Permission) -> bool {
        Self::parse(role_name).is_some_and(|role| role.has_permission(required))
    }
}
