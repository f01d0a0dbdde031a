//! Payment provider boundary.
//!
//! [`CheckoutProvider`] is the only place the backend talks to the payment
//! processor. Handlers receive it as an injected `Arc<dyn CheckoutProvider>`
//! so tests can substitute a fake. Implementations make exactly one outbound
//! call per method and never retry.

mod stripe;

pub use stripe::StripeCheckout;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::SessionSpec;

/// A hosted checkout session returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub session_id: String,
    /// Hosted page the browser should be sent to.
    pub checkout_url: String,
}

/// A checkout session as returned by the provider's listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCheckoutSession {
    pub id: String,
    /// `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,
    /// Total in minor units, absent for sessions without a price yet.
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    /// Unix timestamp, seconds.
    pub created: i64,
}

impl ProviderCheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// A payment intent as returned by the provider's listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPaymentIntent {
    pub id: String,
    /// Captured amount in minor units.
    pub amount_received: i64,
    pub currency: String,
    /// e.g. `succeeded`, `requires_payment_method`, `canceled`.
    pub status: String,
    /// Unix timestamp, seconds.
    pub created: i64,
}

impl ProviderPaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// Failures at the provider boundary.
///
/// The contained text is for the operational log only and must never be
/// returned to an API caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure, timeout, provider outage, or an unusable response.
    #[error("payment provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request as invalid.
    #[error("payment provider rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Open a hosted checkout session.
    async fn create_session(&self, spec: &SessionSpec) -> Result<CheckoutSession, ProviderError>;

    /// Most recent checkout sessions, newest first, at most `limit`.
    async fn list_checkout_sessions(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderCheckoutSession>, ProviderError>;

    /// Most recent payment intents, newest first, at most `limit`.
    async fn list_payment_intents(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderPaymentIntent>, ProviderError>;
}
