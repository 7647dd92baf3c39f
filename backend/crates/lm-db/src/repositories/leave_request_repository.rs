use crate::repositories::employee_repository::timestamp;
use crate::{DbError, Result as DbErrorResult};

use lm_core::{LeaveRequest, LeaveStatus};

use std::panic::Location;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use error_location::ErrorLocation;
use sqlx::{FromRow, SqlitePool};

const LEAVE_COLUMNS: &str = r#"
    lr.id, lr.employee_id, e.name AS employee_name, lr.leave_type,
    lr.start_date, lr.end_date, lr.total_days, lr.reason, lr.status,
    lr.approved_by, lr.approved_at, lr.created_at
"#;

#[derive(FromRow)]
struct LeaveRequestRow {
    id: i64,
    employee_id: i64,
    employee_name: Option<String>,
    leave_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_days: i64,
    reason: String,
    status: String,
    approved_by: Option<i64>,
    approved_at: Option<i64>,
    created_at: i64,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = DbError;

    #[track_caller]
    fn try_from(row: LeaveRequestRow) -> DbErrorResult<Self> {
        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            leave_type: row.leave_type,
            start_date: row.start_date,
            end_date: row.end_date,
            total_days: row.total_days,
            reason: row.reason,
            status: LeaveStatus::from_str(&row.status).map_err(|e| DbError::Initialization {
                message: format!("Invalid leave_request.status: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?,
            approved_by: row.approved_by,
            approved_at: row
                .approved_at
                .map(|secs| timestamp(secs, "leave_request.approved_at"))
                .transpose()?,
            created_at: timestamp(row.created_at, "leave_request.created_at")?,
        })
    }
}

/// Outcome of recording a manager decision
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub request: LeaveRequest,
    /// Name of the employee who filed the request
    pub employee_name: String,
}

#[derive(Clone)]
pub struct LeaveRequestRepository {
    pool: SqlitePool,
}

impl LeaveRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a request and return it with its assigned id
    pub async fn create(&self, request: &LeaveRequest) -> DbErrorResult<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, leave_type, start_date, end_date, total_days, reason, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(&request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.total_days)
        .bind(&request.reason)
        .bind(request.status.as_str())
        .bind(request.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        let mut created = request.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> DbErrorResult<Option<LeaveRequest>> {
        let query = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests lr \
             JOIN employees e ON lr.employee_id = e.id \
             WHERE lr.id = ?"
        );

        let row = sqlx::query_as::<_, LeaveRequestRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    /// Requests filed by one employee, newest first
    pub async fn find_by_employee(&self, employee_id: i64) -> DbErrorResult<Vec<LeaveRequest>> {
        let query = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests lr \
             JOIN employees e ON lr.employee_id = e.id \
             WHERE lr.employee_id = ? \
             ORDER BY lr.created_at DESC, lr.id DESC"
        );

        let rows = sqlx::query_as::<_, LeaveRequestRow>(&query)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    /// Pending requests from employees currently in `department_id`
    pub async fn find_pending_by_department(
        &self,
        department_id: i64,
    ) -> DbErrorResult<Vec<LeaveRequest>> {
        let query = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests lr \
             JOIN employees e ON lr.employee_id = e.id \
             WHERE lr.status = 'pending' AND e.department_id = ? \
             ORDER BY lr.created_at DESC, lr.id DESC"
        );

        let rows = sqlx::query_as::<_, LeaveRequestRow>(&query)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    /// Record an approval or rejection.
    ///
    /// Only pending requests can be decided. Approval deducts `total_days` from the
    /// employee's remaining balance in the same transaction. Returns `None` when no
    /// pending request has this id.
    pub async fn decide(
        &self,
        id: i64,
        status: LeaveStatus,
        approver_id: i64,
    ) -> DbErrorResult<Option<DecisionOutcome>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE leave_requests SET status = ?, approved_by = ?, approved_at = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(approver_id)
        .bind(Utc::now().timestamp())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        if status == LeaveStatus::Approved {
            sqlx::query(
                r#"
                UPDATE employees
                SET remaining_leave_days = remaining_leave_days
                    - (SELECT total_days FROM leave_requests WHERE id = ?)
                WHERE id = (SELECT employee_id FROM leave_requests WHERE id = ?)
                "#,
            )
            .bind(id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let Some(request) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let employee_name = request.employee_name.clone().unwrap_or_default();

        Ok(Some(DecisionOutcome {
            request,
            employee_name,
        }))
    }
}
