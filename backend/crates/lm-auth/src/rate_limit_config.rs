/// Inbound frame budget for a single connection
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum frames per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 60,
        }
    }
}
