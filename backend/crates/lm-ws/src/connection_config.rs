use lm_config::{
    DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_HEARTBEAT_TIMEOUT_SECS, DEFAULT_SEND_BUFFER_SIZE,
    WebSocketConfig,
};

use std::time::Duration;

/// Per-endpoint settings
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound queue capacity
    pub send_buffer_size: usize,
    /// Ping interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Inbound silence tolerated before closing, in seconds
    pub heartbeat_timeout_secs: u64,
}

impl ConnectionConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
        }
    }
}

impl From<&WebSocketConfig> for ConnectionConfig {
    fn from(config: &WebSocketConfig) -> Self {
        Self {
            send_buffer_size: config.send_buffer_size,
            heartbeat_interval_secs: config.heartbeat_interval_secs,
            heartbeat_timeout_secs: config.heartbeat_timeout_secs,
        }
    }
}
