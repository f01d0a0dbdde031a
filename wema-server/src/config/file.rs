//! TOML file configuration structures.
//!
//! These structs directly map to the `wema-config.toml` file format. Every
//! section is optional so a deployment can be configured from the
//! environment alone.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub frontend: FrontendConfig,
    pub provider: ProviderConfig,
    pub admin: AdminConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:5000").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

/// Frontend section: where donors are sent back to, and who may call us.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub origin: String,
    /// Extra CORS origins, e.g. the local dev server.
    pub extra_allowed_origins: Vec<String>,
    pub append_session_id: bool,
}

pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
            extra_allowed_origins: vec![DEFAULT_FRONTEND_ORIGIN.to_string()],
            append_session_id: false,
        }
    }
}

/// Payment provider section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Usually supplied through `STRIPE_SECRET_KEY` instead.
    pub secret_key: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            api_base: None,
            timeout_secs: 30,
        }
    }
}

/// Admin section. The password may be plaintext or an argon2 hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub token_secret: Option<String>,
}

impl AdminConfig {
    /// Check if the admin password is already hashed (argon2 format).
    pub fn is_password_hashed(&self) -> bool {
        self.password
            .as_deref()
            .is_some_and(|p| p.starts_with("$argon2"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub api_max_requests: u32,
    pub api_window_secs: u64,
    pub checkout_max_requests: u32,
    pub checkout_window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            api_max_requests: 100,
            api_window_secs: 15 * 60,
            checkout_max_requests: 20,
            checkout_window_secs: 60,
        }
    }
}
