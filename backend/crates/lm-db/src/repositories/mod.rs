pub mod employee_repository;
pub mod leave_request_repository;
