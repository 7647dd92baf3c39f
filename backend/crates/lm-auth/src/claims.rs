use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

const MAX_ROLE_NAME_LENGTH: usize = 64;

/// Session token claims issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employee primary key
    pub employee_id: i64,
    /// Manager flag captured at login
    pub is_manager: bool,
    pub role_name: String,
    #[serde(default)]
    pub role_id: Option<i64>,
    /// Department at login time, absent for unassigned employees
    #[serde(default)]
    pub department_id: Option<i64>,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.employee_id <= 0 {
            return Err(AuthError::InvalidClaim {
                claim: "employee_id".to_string(),
                message: format!("employee_id must be positive, got {}", self.employee_id),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.role_name.trim().is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "role_name".to_string(),
                message: "role_name cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.role_name.len() > MAX_ROLE_NAME_LENGTH {
            return Err(AuthError::InvalidClaim {
                claim: "role_name".to_string(),
                message: "role_name exceeds maximum length".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
