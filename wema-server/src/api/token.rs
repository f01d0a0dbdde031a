//! Admin bearer tokens (HS256 JWT).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

pub const ADMIN_ROLE: &str = "admin";

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME: Duration = Duration::days(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub role: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token does not carry the admin role")]
    NotAdmin,
}

/// Issue an admin token for `email`, valid from `now` for [`TOKEN_LIFETIME`].
pub fn issue_admin_token(
    email: &str,
    secret: &[u8],
    now: OffsetDateTime,
) -> Result<String, TokenError> {
    let claims = AdminClaims {
        role: ADMIN_ROLE.to_string(),
        email: email.to_string(),
        iat: now.unix_timestamp(),
        exp: (now + TOKEN_LIFETIME).unix_timestamp(),
    };
    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Check signature, expiry and role.
pub fn verify_admin_token(token: &str, secret: &[u8]) -> Result<AdminClaims, TokenError> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )?;
    if data.claims.role != ADMIN_ROLE {
        return Err(TokenError::NotAdmin);
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"jwt-secret";

    #[test]
    fn test_issued_token_verifies() {
        let now = OffsetDateTime::now_utc();
        let token = issue_admin_token("admin@wemacharity.org", SECRET, now).unwrap();

        let claims = verify_admin_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.email, "admin@wemacharity.org");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_admin_token("a@b.co", SECRET, OffsetDateTime::now_utc()).unwrap();
        assert!(verify_admin_token(&token, b"other-secret").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issued = OffsetDateTime::now_utc() - Duration::days(2);
        let token = issue_admin_token("a@b.co", SECRET, issued).unwrap();
        assert!(matches!(
            verify_admin_token(&token, SECRET),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(verify_admin_token("not.a.jwt", SECRET).is_err());
    }
}
