use crate::{DbError, Result as DbErrorResult};

use lm_core::Employee;

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::{FromRow, SqlitePool};

const EMPLOYEE_COLUMNS: &str = r#"
    e.id, e.employee_code, e.name, e.email, e.position,
    e.department_id, r.name AS role_name, e.manager_id,
    e.is_manager, e.is_active, e.total_leave_days, e.remaining_leave_days,
    e.created_at
"#;

#[derive(FromRow)]
struct EmployeeRow {
    id: i64,
    employee_code: String,
    name: String,
    email: String,
    position: String,
    department_id: Option<i64>,
    role_name: Option<String>,
    manager_id: Option<i64>,
    is_manager: bool,
    is_active: bool,
    total_leave_days: i64,
    remaining_leave_days: i64,
    created_at: i64,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = DbError;

    #[track_caller]
    fn try_from(row: EmployeeRow) -> DbErrorResult<Self> {
        Ok(Employee {
            id: row.id,
            employee_code: row.employee_code,
            name: row.name,
            email: row.email,
            position: row.position,
            department_id: row.department_id,
            role_name: row.role_name,
            manager_id: row.manager_id,
            is_manager: row.is_manager,
            is_active: row.is_active,
            total_leave_days: row.total_leave_days,
            remaining_leave_days: row.remaining_leave_days,
            created_at: timestamp(row.created_at, "employee.created_at")?,
        })
    }
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, employee_id: i64) -> DbErrorResult<Option<Employee>> {
        let query = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees e \
             LEFT JOIN roles r ON e.role_id = r.id \
             WHERE e.id = ?"
        );

        let row = sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Employee::try_from).transpose()
    }

    /// Current department of an employee, read live from the store.
    ///
    /// Fails when the employee does not exist or has no department assigned.
    pub async fn department_of(&self, employee_id: i64) -> DbErrorResult<i64> {
        let row: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT department_id FROM employees WHERE id = ?")
                .bind(employee_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((Some(department_id),)) => Ok(department_id),
            Some((None,)) => Err(DbError::NoDepartment {
                employee_id,
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Err(DbError::EmployeeNotFound {
                employee_id,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

#[track_caller]
pub(crate) fn timestamp(secs: i64, field: &str) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| DbError::Initialization {
        message: format!("Invalid timestamp in {field}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
