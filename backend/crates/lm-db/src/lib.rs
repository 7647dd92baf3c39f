pub mod error;
pub mod repositories;

pub use error::{DbError, Result};
pub use repositories::employee_repository::EmployeeRepository;
pub use repositories::leave_request_repository::{DecisionOutcome, LeaveRequestRepository};
