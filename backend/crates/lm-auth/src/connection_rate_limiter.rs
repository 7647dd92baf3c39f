use crate::{AuthError, RateLimitConfig, Result as AuthErrorResult};

use std::num::NonZeroU32;
use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Per-connection limiter for client-originated frames.
///
/// Connections are push-only, so a client that keeps talking past its budget is
/// misbehaving and gets disconnected by the caller.
pub struct ConnectionRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: RateLimitConfig,
}

impl ConnectionRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(config.window_secs.max(1));

        // Replenish one cell every window/burst, allowing the whole budget at once
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::direct(quota),
            config,
        }
    }

    /// Check if another frame is allowed
    #[track_caller]
    pub fn check(&self) -> AuthErrorResult<()> {
        self.limiter
            .check()
            .map_err(|_| AuthError::RateLimitExceeded {
                limit: self.config.max_requests,
                window_secs: self.config.window_secs,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
