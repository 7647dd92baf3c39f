//! Bearer authentication for the REST API

use crate::{ApiError, ApiResult};

use lm_auth::{AuthError, EmployeeContext};
use lm_core::Permission;
use lm_ws::AppState;

use std::future::Future;
use std::panic::Location;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use error_location::ErrorLocation;

/// Verified caller of a REST endpoint.
///
/// Only the `Authorization: Bearer` header is accepted here; the query-string
/// token is reserved for the WebSocket upgrade.
#[derive(Debug, Clone)]
pub struct AuthEmployee(pub EmployeeContext);

impl AuthEmployee {
    /// 403 unless the caller's role grants `required`
    #[track_caller]
    pub fn require(&self, required: Permission) -> ApiResult<()> {
        if self.0.has_permission(required) {
            return Ok(());
        }

        Err(ApiError::forbidden(format!(
            "Role '{}' lacks permission {}",
            self.0.role_name, required
        )))
    }

    /// 403 unless the token carries the manager flag
    #[track_caller]
    pub fn require_manager(&self) -> ApiResult<()> {
        if self.0.is_manager {
            return Ok(());
        }

        Err(ApiError::forbidden("Access denied"))
    }
}

impl FromRequestParts<AppState> for AuthEmployee {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let header = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| AuthError::MissingToken {
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let token = lm_auth::bearer::from_authorization_header(header)?;
            let employee = state.jwt_validator.authenticate(token)?;

            log::debug!(
                "REST caller: employee {} ({})",
                employee.employee_id,
                employee.role_name
            );

            Ok(AuthEmployee(employee))
        }
    }
}
