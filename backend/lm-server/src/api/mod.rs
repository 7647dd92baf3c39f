pub mod debug;
pub mod error;
pub mod extractors;
pub mod leave_requests;
