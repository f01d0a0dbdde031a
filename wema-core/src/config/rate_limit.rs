//! Request rate limit configuration.

use std::time::Duration;

/// A fixed window: at most `max_requests` per client IP every `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Applied to every route under `/api`.
    pub api: WindowConfig,
    /// Applied on top of `api` to donation checkout creation.
    pub checkout: WindowConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            api: WindowConfig {
                max_requests: 100,
                window: Duration::from_secs(15 * 60),
            },
            checkout: WindowConfig {
                max_requests: 20,
                window: Duration::from_secs(60),
            },
        }
    }
}
