use crate::Claims;

use lm_core::{Permission, Role};

/// Verified identity of the caller, built only from validated claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeContext {
    pub employee_id: i64,
    pub is_manager: bool,
    pub role_name: String,
    pub department_id: Option<i64>,
}

impl EmployeeContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            employee_id: claims.employee_id,
            is_manager: claims.is_manager,
            role_name: claims.role_name,
            department_id: claims.department_id,
        }
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role_name)
    }

    pub fn has_permission(&self, required: Permission) -> bool {
        Role::name_has_permission(&self.role_name, required)
    }
}
