//! Notification hub diagnostics

use crate::{ApiResult, AuthEmployee};

use lm_core::Permission;
use lm_ws::{AppState, ClientsSummary, DispatchJob};

use axum::{Json, extract::State, http::StatusCode};
use chrono::{Days, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_TEST_EMPLOYEE_NAME: &str = "Test Employee";

#[derive(Debug, Deserialize)]
pub struct TestNotificationRequest {
    pub department_id: i64,
    #[serde(default)]
    pub employee_name: Option<String>,
}

/// GET /api/debug/websocket
pub async fn websocket_clients(
    State(state): State<AppState>,
    caller: AuthEmployee,
) -> ApiResult<Json<ClientsSummary>> {
    caller.require(Permission::UsersRead)?;

    Ok(Json(state.notifier.connected_clients_summary().await))
}

/// POST /api/debug/test-notification
///
/// Queue a sample new-leave-request notification for one department
pub async fn send_test_notification(
    State(state): State<AppState>,
    caller: AuthEmployee,
    Json(body): Json<TestNotificationRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    caller.require(Permission::UsersWrite)?;

    let employee_name = body
        .employee_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_EMPLOYEE_NAME.to_string());
    let today = Utc::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    state.dispatcher.submit(DispatchJob::NewLeaveRequest {
        employee_name: employee_name.clone(),
        leave_type: "annual".to_string(),
        start_date: today.to_string(),
        end_date: tomorrow.to_string(),
        reason: "Test notification".to_string(),
        department_id: body.department_id,
    });

    log::info!(
        "Employee {} queued a test notification for department {}",
        caller.0.employee_id,
        body.department_id
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "Test notification queued",
            "department_id": body.department_id,
            "employee_name": employee_name,
        })),
    ))
}
