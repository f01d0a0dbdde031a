//! Admin API client (admin dashboard → Wema server).
//!
//! Log in once with [`AdminClient::login`]; later calls carry the issued
//! token as `Authorization: Bearer …`.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{AdminLoginRequest, AdminLoginResponse, AdminPayment, AdminStats};

/// Typed HTTP client for the **Admin API**.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl AdminClient {
    /// Exchange admin credentials for a token and return a ready client.
    pub async fn login(
        base_url: Url,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = Client::new();
        let url = base_url.join("/api/admin/login")?;
        let body = AdminLoginRequest {
            email: email.into(),
            password: password.into(),
        };

        let resp = http.post(url).json(&body).send().await?;
        let AdminLoginResponse { token } = parse_response(resp).await?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Build a client from a token obtained earlier.
    pub fn with_token(base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// `GET /api/admin/donations` – recent provider payments.
    pub async fn payments(&self) -> Result<Vec<AdminPayment>, ClientError> {
        let url = self.base_url.join("/api/admin/donations")?;
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/admin/stats` – totals over recent succeeded payments.
    pub async fn stats(&self) -> Result<AdminStats, ClientError> {
        let url = self.base_url.join("/api/admin/stats")?;
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        parse_response(resp).await
    }
}
