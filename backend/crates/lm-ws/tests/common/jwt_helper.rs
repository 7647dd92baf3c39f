#![allow(dead_code)]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

/// Claims in the production token format
#[derive(Debug, Serialize)]
pub struct TestJwtClaims {
    pub employee_id: i64,
    pub is_manager: bool,
    pub role_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    pub exp: u64,
    pub iat: u64,
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

fn role_for(is_manager: bool) -> &'static str {
    if is_manager { "manager" } else { "employee" }
}

fn sign(claims: &TestJwtClaims, jwt_secret: &[u8]) -> String {
    encode(
        &Header::default(), // HS256
        claims,
        &EncodingKey::from_secret(jwt_secret),
    )
    .expect("Failed to encode JWT")
}

/// Create a valid token for testing
pub fn create_test_token(employee_id: i64, is_manager: bool, jwt_secret: &[u8]) -> String {
    create_test_token_with_expiry(employee_id, is_manager, jwt_secret, Duration::from_secs(3600))
}

pub fn create_test_token_with_expiry(
    employee_id: i64,
    is_manager: bool,
    jwt_secret: &[u8],
    expires_in: Duration,
) -> String {
    let now = now();
    sign(
        &TestJwtClaims {
            employee_id,
            is_manager,
            role_name: role_for(is_manager).to_string(),
            department_id: None,
            exp: now + expires_in.as_secs(),
            iat: now,
        },
        jwt_secret,
    )
}

/// Token that expired an hour ago
pub fn create_expired_token(employee_id: i64, jwt_secret: &[u8]) -> String {
    let past = now() - 3600;
    sign(
        &TestJwtClaims {
            employee_id,
            is_manager: false,
            role_name: "employee".to_string(),
            department_id: None,
            exp: past,
            iat: past - 3600,
        },
        jwt_secret,
    )
}

pub fn create_token_wrong_secret(employee_id: i64) -> String {
    create_test_token(employee_id, false, b"wrong-secret-key-that-is-also-32-bytes-long")
}

/// Signed correctly but carrying an invalid identity
pub fn create_token_without_identity(jwt_secret: &[u8]) -> String {
    create_test_token(0, false, jwt_secret)
}
