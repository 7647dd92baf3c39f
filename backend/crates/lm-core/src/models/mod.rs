pub mod department;
pub mod employee;
pub mod leave_request;
pub mod leave_status;
pub mod permission;
pub mod role;
