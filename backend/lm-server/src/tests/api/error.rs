use crate::ApiError;

use lm_auth::AuthError;
use lm_core::{CoreError, LeaveStatus};
use lm_db::DbError;

use std::panic::Location;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;
use serde_json::Value;

async fn render(error: ApiError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_not_found_when_rendered_then_404_with_code() {
    let (status, json) = render(ApiError::not_found("Leave request 9 not found")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "Leave request 9 not found");
    assert!(json["error"].get("field").is_none());
}

#[tokio::test]
async fn given_validation_error_when_rendered_then_400_with_field() {
    let (status, json) = render(ApiError::validation("bad status", "status")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "status");
}

#[tokio::test]
async fn given_forbidden_when_rendered_then_403() {
    let (status, json) = render(ApiError::forbidden("Access denied")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn given_conflict_when_rendered_then_409_with_current_status() {
    let (status, json) = render(ApiError::conflict(
        "Leave request 3 was already decided",
        LeaveStatus::Approved,
    ))
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");
    assert_eq!(
        json["error"]["message"],
        "Leave request 3 was already decided (current status: approved)"
    );
}

#[tokio::test]
async fn given_expired_token_when_converted_then_401_token_expired() {
    let error = ApiError::from(AuthError::TokenExpired {
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = render(error).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "TOKEN_EXPIRED");
    assert_eq!(json["error"]["message"], "Token expired");
}

#[tokio::test]
async fn given_core_validation_when_converted_then_field_preserved() {
    let error = ApiError::from(CoreError::Validation {
        message: "end_date is before start_date".into(),
        field: Some("end_date".into()),
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = render(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["field"], "end_date");
}

#[tokio::test]
async fn given_unknown_status_when_converted_then_validation_on_status_field() {
    let error = ApiError::from(CoreError::InvalidLeaveStatus {
        value: "maybe".into(),
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = render(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["field"], "status");
    assert!(json["error"]["message"].as_str().unwrap().contains("maybe"));
}

#[tokio::test]
async fn given_missing_department_when_converted_then_400() {
    let error = ApiError::from(DbError::NoDepartment {
        employee_id: 4,
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = render(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn given_sqlx_failure_when_converted_then_500_without_details() {
    let error = ApiError::from(DbError::from(sqlx::Error::PoolClosed));

    let (status, json) = render(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["message"], "Database operation failed");
}

#[tokio::test]
async fn given_row_not_found_when_converted_then_404() {
    let error = ApiError::from(DbError::from(sqlx::Error::RowNotFound));

    let (status, _) = render(error).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
