pub mod bearer;
pub mod claims;
pub mod connection_rate_limiter;
pub mod employee_context;
pub mod error;
pub mod jwt_validator;
pub mod rate_limit_config;
pub mod rate_limiter_factory;

pub use bearer::select_token;
pub use claims::Claims;
pub use connection_rate_limiter::ConnectionRateLimiter;
pub use employee_context::EmployeeContext;
pub use error::{AuthError, Result};
pub use jwt_validator::JwtValidator;
pub use rate_limit_config::RateLimitConfig;
pub use rate_limiter_factory::RateLimiterFactory;
