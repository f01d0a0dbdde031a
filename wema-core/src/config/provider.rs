//! Payment provider configuration.

use std::time::Duration;
use url::Url;

/// Stripe API root used when the config does not override it.
pub const DEFAULT_PROVIDER_API_BASE: &str = "https://api.stripe.com";

/// Payment provider connection settings.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Secret API key. Never logged.
    pub secret_key: String,
    /// API root, overridable for test doubles.
    pub api_base: Url,
    /// Upper bound on a single provider call.
    pub timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}
