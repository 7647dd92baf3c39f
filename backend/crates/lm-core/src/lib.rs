pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::{CoreError, CoreResult, ErrorLocation};
pub use models::department::Department;
pub use models::employee::Employee;
pub use models::leave_request::LeaveRequest;
pub use models::leave_status::LeaveStatus;
pub use models::permission::Permission;
pub use models::role::Role;
