//! Application state shared across all request handlers.

use std::sync::Arc;

use wema_core::config::{RateLimitConfig, SharedConfig};
use wema_core::provider::CheckoutProvider;
use wema_core::utils::rate_limit::FixedWindowLimiter;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Hosted checkout provider, built once at startup.
    pub provider: Arc<dyn CheckoutProvider>,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    pub limiters: RateLimiters,
}

/// Per-client request counters.
#[derive(Clone)]
pub struct RateLimiters {
    /// Every route under `/api`.
    pub api: Arc<FixedWindowLimiter>,
    /// Donation checkout creation only.
    pub checkout: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn CheckoutProvider>,
        config: SharedConfig,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            provider,
            config,
            limiters: RateLimiters {
                api: Arc::new(FixedWindowLimiter::new(rate_limit.api)),
                checkout: Arc::new(FixedWindowLimiter::new(rate_limit.checkout)),
            },
        }
    }
}
