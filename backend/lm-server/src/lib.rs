pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    debug::{TestNotificationRequest, send_test_notification, websocket_clients},
    error::ApiError,
    error::Result as ApiResult,
    extractors::auth_employee::AuthEmployee,
    leave_requests::{
        create_leave_request::CreateLeaveRequest,
        leave_request_dto::LeaveRequestDto,
        leave_request_list_response::LeaveRequestListResponse,
        leave_requests::{
            create_leave_request, list_my_leave_requests, list_pending_leave_requests,
            update_leave_status,
        },
        update_leave_status_request::UpdateLeaveStatusRequest,
    },
};

pub use crate::routes::{build_router, metrics_router};
