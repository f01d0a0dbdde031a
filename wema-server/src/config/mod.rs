//! Configuration module for wema-server.
//!
//! Handles loading configuration from the TOML file, environment variables
//! and CLI arguments, in that order of precedence (later wins). Also
//! handles admin password hashing.

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;
use wema_core::config::{
    AdminConfig, DEFAULT_PROVIDER_API_BASE, FrontendConfig, ProviderConfig, RateLimitConfig,
    ServerConfig, SharedConfig, WindowConfig,
};

pub const ENV_PROVIDER_SECRET: &str = "STRIPE_SECRET_KEY";
pub const ENV_FRONTEND_ORIGIN: &str = "VITE_FRONTEND_ORIGIN";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ADMIN_EMAIL: &str = "ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const ENV_TOKEN_SECRET: &str = "JWT_SECRET";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid frontend origin {0:?}")]
    InvalidOrigin(String),

    #[error("password hashing error: {0}")]
    HashError(String),

    #[error("payment provider secret key is not set (STRIPE_SECRET_KEY)")]
    MissingProviderSecret,
}

/// Loaded configuration result containing all parts.
#[derive(Debug)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub frontend: FrontendConfig,
    pub provider: ProviderConfig,
    pub admin: Option<AdminConfig>,
    pub rate_limit: RateLimitConfig,
}

impl LoadedConfig {
    /// Split off the reloadable sections into a [`SharedConfig`].
    pub fn to_shared(&self) -> SharedConfig {
        SharedConfig::new(self.frontend.clone(), self.admin.clone())
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Create a new config loader reading the process environment.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the environment lookup.
    pub fn with_env(
        mut self,
        env: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, if there is one
    /// 2. Apply environment and CLI overrides
    /// 3. Validate the configuration
    /// 4. Hash the admin password if it's plaintext (in memory only)
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults and environment"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        self.apply_overrides(&mut file_config)?;
        self.build_loaded_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn apply_overrides(&self, config: &mut FileConfig) -> Result<(), ConfigError> {
        if let Some(secret) = self.var(ENV_PROVIDER_SECRET) {
            config.provider.secret_key = Some(secret);
        }
        if let Some(origin) = self.var(ENV_FRONTEND_ORIGIN) {
            config.frontend.origin = origin;
        }
        if let Some(port) = self.var(ENV_PORT) {
            let port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::ValidationError(format!("invalid PORT {port:?}")))?;
            config.server.listen.set_port(port);
        }
        if let Some(email) = self.var(ENV_ADMIN_EMAIL) {
            config.admin.email = Some(email);
        }
        if let Some(password) = self.var(ENV_ADMIN_PASSWORD) {
            config.admin.password = Some(password);
        }
        if let Some(secret) = self.var(ENV_TOKEN_SECRET) {
            config.admin.token_secret = Some(secret);
        }
        if let Some(listen) = self.listen_override {
            config.server.listen = listen;
        }
        Ok(())
    }

    fn build_loaded_config(&self, config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let secret_key = config
            .provider
            .secret_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingProviderSecret)?;

        let api_base = config
            .provider
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_PROVIDER_API_BASE);
        let api_base = Url::parse(api_base).map_err(|e| {
            ConfigError::ValidationError(format!("invalid provider api_base {api_base:?}: {e}"))
        })?;

        if config.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider timeout_secs must be positive".to_string(),
            ));
        }

        let rate = &config.rate_limit;
        if rate.api_max_requests == 0
            || rate.checkout_max_requests == 0
            || rate.api_window_secs == 0
            || rate.checkout_window_secs == 0
        {
            return Err(ConfigError::ValidationError(
                "rate limit values must be positive".to_string(),
            ));
        }

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: config.server.listen,
            },
            frontend: FrontendConfig::new(
                parse_origin(&config.frontend.origin)?,
                config.frontend.extra_allowed_origins,
                config.frontend.append_session_id,
            ),
            provider: ProviderConfig {
                secret_key,
                api_base,
                timeout: Duration::from_secs(config.provider.timeout_secs),
            },
            admin: self.build_admin(config.admin)?,
            rate_limit: RateLimitConfig {
                api: WindowConfig {
                    max_requests: rate.api_max_requests,
                    window: Duration::from_secs(rate.api_window_secs),
                },
                checkout: WindowConfig {
                    max_requests: rate.checkout_max_requests,
                    window: Duration::from_secs(rate.checkout_window_secs),
                },
            },
        })
    }

    fn build_admin(&self, admin: file::AdminConfig) -> Result<Option<AdminConfig>, ConfigError> {
        let password_hashed = admin.is_password_hashed();
        let (Some(email), Some(password), Some(token_secret)) =
            (admin.email, admin.password, admin.token_secret)
        else {
            tracing::warn!("Admin email, password or token secret not set, admin API disabled");
            return Ok(None);
        };

        let password_hash = if password_hashed {
            password
        } else {
            hash_password(&password)?
        };

        Ok(Some(AdminConfig::new(
            email,
            password_hash,
            token_secret.into_bytes(),
        )))
    }
}

/// Accept only `http(s)://host[:port]`, with or without a trailing slash.
fn parse_origin(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidOrigin(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidOrigin(raw.to_string()));
    }
    Ok(url)
}

fn hash_password(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn loader(vars: &[(&str, &str)]) -> ConfigLoader {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigLoader::new("/nonexistent/wema-config.toml", None)
            .with_env(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_provider_secret_is_fatal() {
        let err = loader(&[]).load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingProviderSecret));

        let err = loader(&[(ENV_PROVIDER_SECRET, "   ")]).load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingProviderSecret));
    }

    #[test]
    fn test_environment_only_config() {
        let config = loader(&[
            (ENV_PROVIDER_SECRET, "sk_test_123"),
            (ENV_FRONTEND_ORIGIN, "https://wemacharity.org/"),
            (ENV_PORT, "8080"),
        ])
        .load()
        .unwrap();

        assert_eq!(config.provider.secret_key, "sk_test_123");
        assert_eq!(config.provider.timeout, Duration::from_secs(30));
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.frontend.success_url(), "https://wemacharity.org/success");
        assert!(
            config
                .frontend
                .allowed_origins()
                .contains(&"http://localhost:5173".to_string())
        );
        assert!(config.admin.is_none());
        assert_eq!(config.rate_limit, RateLimitConfig::default());
    }

    #[test]
    fn test_cli_listen_wins_over_port() {
        let listen: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ConfigLoader::new("/nonexistent/wema-config.toml", Some(listen))
            .with_env(|key| match key {
                ENV_PROVIDER_SECRET => Some("sk".to_string()),
                ENV_PORT => Some("8080".to_string()),
                _ => None,
            })
            .load()
            .unwrap();
        assert_eq!(config.server.listen, listen);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = loader(&[(ENV_PROVIDER_SECRET, "sk"), (ENV_PORT, "eighty")])
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = loader(&[(ENV_PROVIDER_SECRET, "sk"), (ENV_FRONTEND_ORIGIN, "wemacharity")])
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }

    #[test]
    fn test_plaintext_admin_password_is_hashed() {
        let config = loader(&[
            (ENV_PROVIDER_SECRET, "sk"),
            (ENV_ADMIN_EMAIL, "admin@wemacharity.org"),
            (ENV_ADMIN_PASSWORD, "hunter2"),
            (ENV_TOKEN_SECRET, "jwt-secret"),
        ])
        .load()
        .unwrap();

        let admin = config.admin.unwrap();
        assert!(admin.password_hash.starts_with("$argon2"));
        assert!(admin.verify_credentials("admin@wemacharity.org", "hunter2"));
        assert_eq!(admin.token_secret(), b"jwt-secret");
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = std::env::temp_dir().join(format!("wema-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wema-config.toml");
        std::fs::write(
            &path,
            r#"
[frontend]
origin = "https://wemacharity.org"

[provider]
secret_key = "sk_from_file"
api_base = "http://127.0.0.1:12111"
"#,
        )
        .unwrap();

        let config = ConfigLoader::new(&path, None)
            .with_env(|_| None)
            .load()
            .unwrap();
        assert_eq!(config.provider.secret_key, "sk_from_file");
        assert_eq!(config.provider.api_base.as_str(), "http://127.0.0.1:12111/");
        assert_eq!(config.frontend.origin().as_str(), "https://wemacharity.org/");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
