use crate::{Result as WsErrorResult, WsError};

use lm_db::EmployeeRepository;

use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;

/// Resolves an employee's current department at delivery time
#[async_trait]
pub trait DepartmentLookup: Send + Sync {
    async fn department_of(&self, employee_id: i64) -> WsErrorResult<i64>;
}

#[async_trait]
impl DepartmentLookup for EmployeeRepository {
    async fn department_of(&self, employee_id: i64) -> WsErrorResult<i64> {
        EmployeeRepository::department_of(self, employee_id)
            .await
            .map_err(|e| WsError::DepartmentLookup {
                employee_id,
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
