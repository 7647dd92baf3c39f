use crate::AuthEmployee;
use crate::tests::{TEST_SECRET, create_test_state};

use lm_auth::Claims;
use lm_core::Permission;

use axum::{body::Body, extract::FromRequestParts, http::Request};
use chrono::Utc;
use http::StatusCode;
use jsonwebtoken::{EncodingKey, Header, encode};

fn token(employee_id: i64, is_manager: bool, role_name: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        employee_id,
        is_manager,
        role_name: role_name.to_string(),
        role_id: None,
        department_id: Some(1),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}

async fn extract(authorization: Option<String>) -> Result<AuthEmployee, crate::ApiError> {
    let state = create_test_state().await;
    let mut builder = Request::builder();
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    let (mut parts, _body) = builder.body(Body::empty()).unwrap().into_parts();

    AuthEmployee::from_request_parts(&mut parts, &state).await
}

#[tokio::test]
async fn given_valid_bearer_when_extracted_then_employee_context_built() {
    let result = extract(Some(format!("Bearer {}", token(7, true, "manager")))).await;

    let AuthEmployee(employee) = result.unwrap();
    assert_eq!(employee.employee_id, 7);
    assert!(employee.is_manager);
    assert_eq!(employee.role_name, "manager");
    assert_eq!(employee.department_id, Some(1));
}

#[tokio::test]
async fn given_no_header_when_extracted_then_unauthorized() {
    let result = extract(None).await;

    let response = axum::response::IntoResponse::into_response(result.unwrap_err());
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_basic_scheme_when_extracted_then_unauthorized() {
    let result = extract(Some("Basic dXNlcjpwYXNz".to_string())).await;

    let response = axum::response::IntoResponse::into_response(result.unwrap_err());
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_employee_role_when_requiring_permissions_then_only_leave_permissions_granted() {
    let caller = extract(Some(format!("Bearer {}", token(3, false, "employee"))))
        .await
        .unwrap();

    assert!(caller.require(Permission::LeaveWrite).is_ok());
    assert!(caller.require(Permission::LeaveRead).is_ok());
    assert!(caller.require(Permission::LeaveApprove).is_err());
    assert!(caller.require_manager().is_err());
}

#[tokio::test]
async fn given_unknown_role_when_requiring_permission_then_forbidden() {
    let caller = extract(Some(format!("Bearer {}", token(3, false, "contractor"))))
        .await
        .unwrap();

    let err = caller.require(Permission::LeaveRead).unwrap_err();
    let response = axum::response::IntoResponse::into_response(err);
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
