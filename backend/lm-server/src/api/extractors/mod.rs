pub mod auth_employee;
