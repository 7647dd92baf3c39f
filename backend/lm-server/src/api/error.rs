//! REST API error types
//!
//! Every variant renders as `{"error": {"code", "message", "field"?}}` with a matching status.

use lm_auth::AuthError;
use lm_core::{CoreError, LeaveStatus};
use lm_db::DbError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable code, e.g. "NOT_FOUND"
    pub code: String,
    pub message: String,
    /// Offending field for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// 400
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// 401
    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// 403
    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    /// 409
    #[error("Conflict: {message} (current status: {current_status}) {location}")]
    Conflict {
        message: String,
        current_status: LeaveStatus,
        location: ErrorLocation,
    },

    /// 500
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },

    /// 400
    #[error("Bad request: {message} {location}")]
    BadRequest {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn conflict(message: impl Into<String>, current_status: LeaveStatus) -> Self {
        Self::Conflict {
            message: message.into(),
            current_status,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>, field: &str) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal { .. } => log::error!("{}", self),
            _ => log::debug!("{}", self),
        }

        let (status, body) = match self {
            ApiError::NotFound { message, .. } => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".into(),
                    message,
                    field: None,
                },
            ),
            ApiError::Validation { message, field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".into(),
                    message,
                    field,
                },
            ),
            ApiError::Unauthorized { code, message, .. } => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: code.into(),
                    message,
                    field: None,
                },
            ),
            ApiError::Forbidden { message, .. } => (
                StatusCode::FORBIDDEN,
                ApiErrorBody {
                    code: "FORBIDDEN".into(),
                    message,
                    field: None,
                },
            ),
            ApiError::Conflict {
                message,
                current_status,
                ..
            } => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "CONFLICT".into(),
                    message: format!("{} (current status: {})", message, current_status),
                    field: None,
                },
            ),
            ApiError::Internal { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".into(),
                    message,
                    field: None,
                },
            ),
            ApiError::BadRequest { message, .. } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".into(),
                    message,
                    field: None,
                },
            ),
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    #[track_caller]
    fn from(e: sqlx::Error) -> Self {
        // Database details stay in the log
        log::error!("Database error: {}", e);
        ApiError::Internal {
            message: "Database operation failed".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for ApiError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        match e {
            DbError::EmployeeNotFound { employee_id, .. } => ApiError::NotFound {
                message: format!("Employee {} not found", employee_id),
                location: ErrorLocation::from(Location::caller()),
            },
            DbError::NoDepartment { employee_id, .. } => ApiError::BadRequest {
                message: format!("Employee {} has no department assigned", employee_id),
                location: ErrorLocation::from(Location::caller()),
            },
            DbError::Sqlx { source, .. } => match source {
                sqlx::Error::RowNotFound => ApiError::NotFound {
                    message: "Resource not found".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                other => {
                    log::error!("Database error: {}", other);
                    ApiError::Internal {
                        message: "Database operation failed".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    }
                }
            },
            DbError::Initialization { message, .. } => {
                log::error!("Row conversion failed: {}", message);
                ApiError::Internal {
                    message: "Stored data could not be read".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

impl From<CoreError> for ApiError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation { message, field, .. } => ApiError::Validation {
                message,
                field,
                location: ErrorLocation::from(Location::caller()),
            },
            CoreError::InvalidLeaveStatus { value, .. } => ApiError::Validation {
                message: format!("Invalid status '{}'", value),
                field: Some("status".to_string()),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        let code = e.error_code();
        let message = match &e {
            AuthError::TokenExpired { .. } => "Token expired".to_string(),
            AuthError::MissingToken { .. } => "Missing bearer token".to_string(),
            AuthError::InvalidScheme { .. } => "Expected 'Bearer' authorization".to_string(),
            _ => "Invalid token".to_string(),
        };
        log::debug!("Rejected REST credential: {}", e);

        ApiError::Unauthorized {
            code,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
