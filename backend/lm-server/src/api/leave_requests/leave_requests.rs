//! Leave request REST handlers
//!
//! Notifications are queued on the dispatcher after the write succeeds; the
//! response never waits on delivery.

use crate::{
    ApiError, ApiResult, AuthEmployee, CreateLeaveRequest, LeaveRequestDto,
    LeaveRequestListResponse, UpdateLeaveStatusRequest,
};

use lm_core::{LeaveRequest, LeaveStatus, Permission};
use lm_db::{EmployeeRepository, LeaveRequestRepository};
use lm_ws::{AppState, DispatchJob};

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use log::{info, warn};
use serde_json::{Value, json};

/// POST /api/leave
///
/// File a pending request for the caller and alert their department's managers
pub async fn create_leave_request(
    State(state): State<AppState>,
    caller: AuthEmployee,
    Json(body): Json<CreateLeaveRequest>,
) -> ApiResult<(StatusCode, Json<LeaveRequestDto>)> {
    caller.require(Permission::LeaveWrite)?;
    let employee_id = caller.0.employee_id;

    let employee = EmployeeRepository::new(state.pool.clone())
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Employee {} not found", employee_id)))?;

    let request = LeaveRequest::new(
        employee_id,
        body.leave_type,
        body.start_date,
        body.end_date,
        body.reason,
    )?;
    let created = LeaveRequestRepository::new(state.pool.clone())
        .create(&request)
        .await?;

    info!(
        "Employee {} filed leave request {} ({} days)",
        employee_id, created.id, created.total_days
    );

    match employee.department_id {
        Some(department_id) => state.dispatcher.submit(DispatchJob::NewLeaveRequest {
            employee_name: employee.name.clone(),
            leave_type: created.leave_type.clone(),
            start_date: created.start_date.to_string(),
            end_date: created.end_date.to_string(),
            reason: created.reason.clone(),
            department_id,
        }),
        None => warn!(
            "Employee {} has no department; no managers notified of request {}",
            employee_id, created.id
        ),
    }

    let mut dto = LeaveRequestDto::from(created);
    dto.employee_name = Some(employee.name);

    Ok((StatusCode::CREATED, Json(dto)))
}

/// GET /api/leave/my-requests
pub async fn list_my_leave_requests(
    State(state): State<AppState>,
    caller: AuthEmployee,
) -> ApiResult<Json<LeaveRequestListResponse>> {
    caller.require(Permission::LeaveRead)?;

    let requests = LeaveRequestRepository::new(state.pool.clone())
        .find_by_employee(caller.0.employee_id)
        .await?;

    Ok(Json(LeaveRequestListResponse {
        leave_requests: requests.into_iter().map(LeaveRequestDto::from).collect(),
    }))
}

/// GET /api/leave/pending
///
/// Pending requests from the caller's current department
pub async fn list_pending_leave_requests(
    State(state): State<AppState>,
    caller: AuthEmployee,
) -> ApiResult<Json<LeaveRequestListResponse>> {
    caller.require_manager()?;
    caller.require(Permission::LeaveApprove)?;

    let department_id = EmployeeRepository::new(state.pool.clone())
        .department_of(caller.0.employee_id)
        .await?;

    let requests = LeaveRequestRepository::new(state.pool.clone())
        .find_pending_by_department(department_id)
        .await?;

    log::debug!(
        "Manager {} sees {} pending requests in department {}",
        caller.0.employee_id,
        requests.len(),
        department_id
    );

    Ok(Json(LeaveRequestListResponse {
        leave_requests: requests.into_iter().map(LeaveRequestDto::from).collect(),
    }))
}

/// PUT /api/leave/{id}/status
///
/// Approve or reject, then tell the requester
pub async fn update_leave_status(
    State(state): State<AppState>,
    caller: AuthEmployee,
    Path(id): Path<i64>,
    Json(body): Json<UpdateLeaveStatusRequest>,
) -> ApiResult<Json<Value>> {
    caller.require_manager()?;
    caller.require(Permission::LeaveApprove)?;

    let status = LeaveStatus::from_str(body.status.trim())?;
    if !status.is_decided() {
        return Err(ApiError::validation(
            "status must be 'approved' or 'rejected'",
            "status",
        ));
    }

    let repo = LeaveRequestRepository::new(state.pool.clone());
    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Leave request {} not found", id)))?;

    if current.status.is_decided() {
        return Err(ApiError::conflict(
            format!("Leave request {} was already decided", id),
            current.status,
        ));
    }

    // Another manager may decide it between the read and the write
    let Some(outcome) = repo.decide(id, status, caller.0.employee_id).await? else {
        let stored = repo
            .find_by_id(id)
            .await?
            .map_or(current.status, |request| request.status);
        return Err(ApiError::conflict(
            format!("Leave request {} was already decided", id),
            stored,
        ));
    };

    info!(
        "Manager {} {} leave request {}",
        caller.0.employee_id, status, id
    );

    state.dispatcher.submit(DispatchJob::LeaveStatusChange {
        employee_name: outcome.employee_name,
        status: status.to_string(),
        leave_type: outcome.request.leave_type,
        employee_id: outcome.request.employee_id,
    });

    Ok(Json(json!({ "message": "Leave request updated successfully" })))
}
