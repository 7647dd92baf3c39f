pub mod create_leave_request;
pub mod leave_request_dto;
pub mod leave_request_list_response;
pub mod leave_requests;
pub mod update_leave_status_request;
