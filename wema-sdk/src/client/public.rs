//! Public API client (browser / website → Wema server).

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::IDEMPOTENCY_KEY_HEADER;
use crate::objects::{
    CheckoutSessionResponse, ContactAck, ContactMessage, CreateDonationRequest, DonationSummary,
    HealthResponse,
};

/// Typed HTTP client for the unauthenticated endpoints.
#[derive(Debug, Clone)]
pub struct PublicClient {
    http: Client,
    base_url: Url,
}

impl PublicClient {
    /// Create a new `PublicClient` rooted at `base_url`
    /// (e.g. `https://api.wemacharity.org`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/donations` – start a hosted checkout session.
    pub async fn create_donation(
        &self,
        request: &CreateDonationRequest,
        idempotency_key: Option<&str>,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self.base_url.join("/api/donations")?;

        let mut builder = self.http.post(url).json(request);
        if let Some(key) = idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY_HEADER, key);
        }

        parse_response(builder.send().await?).await
    }

    /// `GET /api/donations` – recent completed donations.
    pub async fn list_donations(&self) -> Result<Vec<DonationSummary>, ClientError> {
        let url = self.base_url.join("/api/donations")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/contact` – submit the contact form.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<ContactAck, ClientError> {
        let url = self.base_url.join("/api/contact")?;
        let resp = self.http.post(url).json(message).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.base_url.join("/api/health")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}
