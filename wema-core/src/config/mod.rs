//! Runtime configuration types for the Wema backend.
//!
//! These types hold validated configuration. File parsing and environment
//! overrides are handled by the server crate.

mod admin;
mod frontend;
mod provider;
mod rate_limit;
mod server;

pub use admin::AdminConfig;
pub use frontend::FrontendConfig;
pub use provider::{DEFAULT_PROVIDER_API_BASE, ProviderConfig};
pub use rate_limit::{RateLimitConfig, WindowConfig};
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// Sections are replaced wholesale on reload. The listen address and the
/// provider section are not here: both are consumed once at startup.
#[derive(Clone)]
pub struct SharedConfig {
    /// Frontend origin used for redirects and CORS.
    pub frontend: Arc<RwLock<FrontendConfig>>,
    /// Admin credentials and token signing secret. `None` disables the
    /// admin surface.
    pub admin: Arc<RwLock<Option<AdminConfig>>>,
}

impl SharedConfig {
    pub fn new(frontend: FrontendConfig, admin: Option<AdminConfig>) -> Self {
        Self {
            frontend: Arc::new(RwLock::new(frontend)),
            admin: Arc::new(RwLock::new(admin)),
        }
    }

    /// Replace every reloadable section.
    pub async fn update_all(&self, frontend: FrontendConfig, admin: Option<AdminConfig>) {
        // Update in sequence to avoid potential deadlocks
        *self.frontend.write().await = frontend;
        *self.admin.write().await = admin;
    }
}
