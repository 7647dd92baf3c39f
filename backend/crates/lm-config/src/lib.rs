mod auth_config;
mod config;
mod database_config;
mod dispatch_config;
mod error;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod server_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use auth_config::{AuthConfig, MIN_JWT_SECRET_LENGTH};
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use dispatch_config::{
    DEFAULT_WORKER_COUNT, DispatchConfig, MAX_WORKER_COUNT, MIN_WORKER_COUNT,
};
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::{
    DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS, MAX_RATE_LIMIT_REQUESTS,
    MAX_RATE_LIMIT_WINDOW_SECS, MIN_RATE_LIMIT_REQUESTS, MIN_RATE_LIMIT_WINDOW_SECS,
    RateLimitConfig,
};
pub use server_config::ServerConfig;
pub use websocket_config::{
    DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_HEARTBEAT_TIMEOUT_SECS, DEFAULT_SEND_BUFFER_SIZE,
    MAX_HEARTBEAT_INTERVAL_SECS, MAX_HEARTBEAT_TIMEOUT_SECS, MAX_SEND_BUFFER_SIZE,
    MIN_HEARTBEAT_INTERVAL_SECS, MIN_HEARTBEAT_TIMEOUT_SECS, MIN_SEND_BUFFER_SIZE,
    WebSocketConfig,
};

pub const CONFIG_DIR_ENV: &str = "LM_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".lm";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_MAX_CONNECTIONS: usize = 10_000;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 100_000;
const DEFAULT_DATABASE_FILENAME: &str = "leave.db";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
