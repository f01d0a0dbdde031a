//! In-memory [`CheckoutProvider`] for tests.
//!
//! Sessions created through the fake are kept as `unpaid` until
//! [`FakeProvider::mark_paid`] is called, mimicking a donor completing the
//! hosted page.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::provider::{
    CheckoutProvider, CheckoutSession, ProviderCheckoutSession, ProviderError,
    ProviderPaymentIntent,
};
use crate::session::SessionSpec;

/// Base of the hosted page URL the fake hands out.
pub const FAKE_CHECKOUT_BASE: &str = "https://checkout.stripe.com/c/pay";

/// Timestamp of the first session the fake creates.
const FIRST_CREATED: i64 = 1_700_000_000;

#[derive(Default)]
struct FakeState {
    specs: Vec<SessionSpec>,
    sessions: Vec<ProviderCheckoutSession>,
    intents: Vec<ProviderPaymentIntent>,
    fail_next_create: Option<ProviderError>,
    fail_listing: bool,
    create_calls: usize,
}

#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<FakeState>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `create_session` call fail with `error`.
    pub fn fail_next_create(&self, error: ProviderError) {
        self.state().fail_next_create = Some(error);
    }

    /// Make every listing call fail.
    pub fn fail_listing(&self) {
        self.state().fail_listing = true;
    }

    /// Number of `create_session` calls, failed ones included.
    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    /// Specs received by successful and failed `create_session` calls.
    pub fn created_specs(&self) -> Vec<SessionSpec> {
        self.state().specs.clone()
    }

    /// Mark a created session as paid by `email`.
    pub fn mark_paid(&self, session_id: &str, email: Option<&str>) -> bool {
        let mut state = self.state();
        match state.sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => {
                session.payment_status = "paid".to_string();
                session.customer_email = email.map(str::to_owned);
                true
            }
            None => false,
        }
    }

    /// Seed a payment intent for the reporting calls.
    pub fn push_payment_intent(&self, intent: ProviderPaymentIntent) {
        self.state().intents.push(intent);
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    async fn create_session(&self, spec: &SessionSpec) -> Result<CheckoutSession, ProviderError> {
        let mut state = self.state();
        state.create_calls += 1;
        state.specs.push(spec.clone());

        if let Some(error) = state.fail_next_create.take() {
            return Err(error);
        }

        let n = state.sessions.len() + 1;
        let id = format!("cs_test_{n}");
        let amount_total = spec
            .line_items
            .iter()
            .map(|item| item.unit_amount * i64::from(item.quantity))
            .sum();
        state.sessions.push(ProviderCheckoutSession {
            id: id.clone(),
            payment_status: "unpaid".to_string(),
            amount_total: Some(amount_total),
            currency: spec.line_items.first().map(|i| i.currency.to_string()),
            customer_email: None,
            created: FIRST_CREATED + n as i64,
        });

        Ok(CheckoutSession {
            checkout_url: format!("{FAKE_CHECKOUT_BASE}/{id}"),
            session_id: id,
        })
    }

    async fn list_checkout_sessions(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderCheckoutSession>, ProviderError> {
        let state = self.state();
        if state.fail_listing {
            return Err(ProviderError::Unavailable("fake listing failure".to_string()));
        }
        Ok(state
            .sessions
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_payment_intents(
        &self,
        limit: u32,
    ) -> Result<Vec<ProviderPaymentIntent>, ProviderError> {
        let state = self.state();
        if state.fail_listing {
            return Err(ProviderError::Unavailable("fake listing failure".to_string()));
        }
        Ok(state
            .intents
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
