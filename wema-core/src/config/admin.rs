//! Admin configuration.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Admin login credentials and token signing secret.
#[derive(Clone)]
pub struct AdminConfig {
    /// The only email allowed to log in.
    pub email: String,
    /// The argon2 hashed admin password.
    pub password_hash: String,
    /// HMAC secret for issued bearer tokens.
    pub token_secret: Box<[u8]>,
}

impl AdminConfig {
    pub fn new(email: String, password_hash: String, token_secret: impl Into<Box<[u8]>>) -> Self {
        Self {
            email,
            password_hash,
            token_secret: token_secret.into(),
        }
    }

    /// Check a login attempt: exact email match and a password matching the hash.
    pub fn verify_credentials(&self, email: &str, password: &str) -> bool {
        if email != self.email {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&self.password_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    pub fn token_secret(&self) -> &[u8] {
        &self.token_secret
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
