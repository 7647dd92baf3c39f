use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_WORKER_COUNT: usize = 1;
pub const MAX_WORKER_COUNT: usize = 64;
pub const DEFAULT_WORKER_COUNT: usize = 2;

/// Background notification dispatch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Tasks draining the notification queue
    pub worker_count: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.worker_count < MIN_WORKER_COUNT || self.worker_count > MAX_WORKER_COUNT {
            return Err(ConfigError::config(format!(
                "dispatch.worker_count must be {}-{}, got {}",
                MIN_WORKER_COUNT, MAX_WORKER_COUNT, self.worker_count
            )));
        }

        Ok(())
    }
}
