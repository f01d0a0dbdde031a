//! Stripe Checkout implementation of [`CheckoutProvider`].
//!
//! Talks to the REST API directly: form-encoded POSTs authenticated with the
//! secret key as a bearer token, JSON responses.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{
    CheckoutProvider, CheckoutSession, ProviderCheckoutSession, ProviderError,
    ProviderPaymentIntent,
};
use crate::config::ProviderConfig;
use crate::session::SessionSpec;

/// Stripe caps list pages at 100 objects.
const MAX_PAGE_SIZE: u32 = 100;

/// Stripe hosted checkout client.
#[derive(Clone)]
pub struct StripeCheckout {
    http: Client,
    api_base: Url,
    secret_key: String,
}

impl std::fmt::Debug for StripeCheckout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeCheckout")
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

impl StripeCheckout {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.api_base
            .join(path)
            .map_err(|e| ProviderError::Unavailable(format!("invalid provider url: {e}")))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        limit: u32,
    ) -> Result<Vec<T>, ProviderError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let response = self
            .http
            .get(self.endpoint(path)?)
            .bearer_auth(&self.secret_key)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(transport_error)?;

        let list: StripeList<T> = parse_response(response).await?;
        Ok(list.data)
    }
}

/// Flatten a [`SessionSpec`] into Stripe's bracketed form fields.
fn session_form(spec: &SessionSpec) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), spec.mode.as_str().to_string()),
        ("success_url".to_string(), spec.success_url.clone()),
        ("cancel_url".to_string(), spec.cancel_url.clone()),
    ];

    for (i, method) in spec.payment_method_types.iter().enumerate() {
        form.push((format!("payment_method_types[{i}]"), (*method).to_string()));
    }

    for (i, item) in spec.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((
            format!("{prefix}[price_data][currency]"),
            item.currency.to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    form
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    #[tracing::instrument(skip_all, err, name = "Stripe:CreateCheckoutSession")]
    async fn create_session(&self, spec: &SessionSpec) -> Result<CheckoutSession, ProviderError> {
        let mut request = self
            .http
            .post(self.endpoint("/v1/checkout/sessions")?)
            .bearer_auth(&self.secret_key)
            .form(&session_form(spec));

        if let Some(key) = &spec.idempotency_key {
            request = request.header(wema_sdk::IDEMPOTENCY_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let session: StripeCheckoutSession = parse_response(response).await?;

        let checkout_url = session.url.ok_or_else(|| {
            ProviderError::Unavailable(format!("session {} has no checkout url", session.id))
        })?;

        debug!(session_id = %session.id, "Stripe checkout session created");
        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url,
        })
    }

    #[tracing::instrument(skip(self), err, name = "Stripe:ListCheckoutSessions")]
    async fn list_checkout_sessions(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderCheckoutSession>, ProviderError> {
        let sessions: Vec<StripeCheckoutSession> =
            self.get_list("/v1/checkout/sessions", limit).await?;
        Ok(sessions.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), err, name = "Stripe:ListPaymentIntents")]
    async fn list_payment_intents(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderPaymentIntent>, ProviderError> {
        let intents: Vec<StripePaymentIntent> = self.get_list("/v1/payment_intents", limit).await?;
        Ok(intents.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    url: Option<String>,
    #[serde(default)]
    payment_status: String,
    amount_total: Option<i64>,
    currency: Option<String>,
    customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    created: i64,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    #[serde(default)]
    amount_received: i64,
    currency: String,
    status: String,
    created: i64,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

impl From<StripeCheckoutSession> for ProviderCheckoutSession {
    fn from(s: StripeCheckoutSession) -> Self {
        ProviderCheckoutSession {
            id: s.id,
            payment_status: s.payment_status,
            amount_total: s.amount_total,
            currency: s.currency,
            customer_email: s.customer_details.and_then(|d| d.email),
            created: s.created,
        }
    }
}

impl From<StripePaymentIntent> for ProviderPaymentIntent {
    fn from(p: StripePaymentIntent) -> Self {
        ProviderPaymentIntent {
            id: p.id,
            amount_received: p.amount_received,
            currency: p.currency,
            status: p.status,
            created: p.created,
        }
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Unavailable("request timed out".to_string())
    } else {
        ProviderError::Unavailable(e.to_string())
    }
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if status.is_success() {
        return serde_json::from_str(&body)
            .map_err(|e| ProviderError::Unavailable(format!("malformed response: {e}")));
    }

    let message = match serde_json::from_str::<StripeErrorBody>(&body) {
        Ok(StripeErrorBody { error }) => format!(
            "{}: {}",
            error.kind.as_deref().unwrap_or("unknown_error"),
            error.message.as_deref().unwrap_or("no message"),
        ),
        Err(_) => body,
    };

    // Auth and throttling failures are our configuration or load, not a bad request.
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(
            ProviderError::Unavailable(format!("status {status}: {message}")),
        ),
        s if s.is_client_error() => Err(ProviderError::Rejected {
            status: s.as_u16(),
            message,
        }),
        _ => Err(ProviderError::Unavailable(format!(
            "status {status}: {message}"
        ))),
    }
}
