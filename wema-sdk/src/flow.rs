//! Browser-side donation flow.
//!
//! Collects an amount and a payment method, then either asks the backend
//! for a hosted checkout session ([`PaymentMethod::Card`]) or hands the
//! amount straight to the alternate provider's button widget
//! ([`PaymentMethod::AlternateProvider`]), which never touches the backend.
//!
//! A flow accepts one submission at a time; a second `submit` while the
//! first is awaiting the backend is refused rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use url::Url;

use crate::client::{ClientError, PublicClient};
use crate::objects::{CheckoutSessionResponse, CreateDonationRequest};

/// Quick-pick amounts offered next to the free-form input, in USD.
pub const PRESET_AMOUNTS: [u32; 5] = [10, 25, 50, 100, 250];

/// Line description shown by the alternate provider's widget.
pub const ALTERNATE_DESCRIPTION: &str = "Charity Donation";

/// Currency the alternate provider's widget is loaded with.
pub const ALTERNATE_CURRENCY: &str = "USD";

/// Message shown to the donor when the backend call fails.
pub const START_FAILED_MESSAGE: &str = "Failed to start donation. Please try again.";

/// The backend call the card path depends on.
#[async_trait]
pub trait DonationBackend: Send + Sync {
    async fn create_donation(
        &self,
        request: &CreateDonationRequest,
    ) -> Result<CheckoutSessionResponse, ClientError>;
}

#[async_trait]
impl DonationBackend for PublicClient {
    async fn create_donation(
        &self,
        request: &CreateDonationRequest,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        PublicClient::create_donation(self, request, None).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Card,
    AlternateProvider,
}

/// Where the amount came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountChoice {
    Preset(u32),
    /// Raw text typed by the donor.
    Custom(String),
}

impl AmountChoice {
    /// Parse the choice into major units. Blank or unparsable text is zero.
    pub fn value(&self) -> Decimal {
        match self {
            AmountChoice::Preset(preset) => Decimal::from(*preset),
            AmountChoice::Custom(text) => text.trim().parse().unwrap_or(Decimal::ZERO),
        }
    }
}

/// What the page should do after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Navigate the browser to the provider's hosted checkout page.
    Redirect(Url),
    /// Render the alternate provider's button with these order parameters.
    AlternateButton {
        client_id: String,
        value: String,
        currency: &'static str,
        description: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("enter an amount greater than zero")]
    InvalidAmount,
    #[error("a donation is already being submitted")]
    InFlight,
    #[error("alternate provider is not configured")]
    AlternateNotConfigured,
    #[error("backend returned an invalid checkout url: {0}")]
    InvalidCheckoutUrl(#[from] url::ParseError),
    #[error("backend call failed: {0}")]
    Backend(#[from] ClientError),
}

impl FlowError {
    /// Text to render inline next to the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            FlowError::InvalidAmount => "Please enter a donation amount.",
            FlowError::InFlight => "Redirecting…",
            FlowError::AlternateNotConfigured => "PayPal not configured",
            FlowError::InvalidCheckoutUrl(_) | FlowError::Backend(_) => START_FAILED_MESSAGE,
        }
    }
}

/// Donation form state plus the submission logic behind it.
pub struct DonationFlow<B> {
    backend: B,
    alternate_client_id: Option<String>,
    amount: Option<AmountChoice>,
    method: PaymentMethod,
    donor_name: Option<String>,
    in_flight: AtomicBool,
    last_error: Mutex<Option<&'static str>>,
}

impl<B: DonationBackend> DonationFlow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            alternate_client_id: None,
            amount: None,
            method: PaymentMethod::default(),
            donor_name: None,
            in_flight: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// Enable the alternate provider with its public client id.
    pub fn with_alternate_client_id(mut self, client_id: impl Into<String>) -> Self {
        let client_id = client_id.into();
        self.alternate_client_id = (!client_id.is_empty()).then_some(client_id);
        self
    }

    pub fn choose_preset(&mut self, preset: u32) {
        self.amount = Some(AmountChoice::Preset(preset));
    }

    pub fn enter_amount(&mut self, text: impl Into<String>) {
        self.amount = Some(AmountChoice::Custom(text.into()));
    }

    pub fn set_method(&mut self, method: PaymentMethod) {
        self.method = method;
    }

    pub fn set_donor_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.donor_name = (!name.trim().is_empty()).then_some(name);
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Current amount in major units, zero when nothing valid is entered.
    pub fn amount(&self) -> Decimal {
        self.amount
            .as_ref()
            .map(AmountChoice::value)
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.amount() > Decimal::ZERO && !self.is_submitting()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Label for the card submit button, e.g. `Donate $50.00`.
    pub fn button_label(&self) -> String {
        if self.is_submitting() {
            "Redirecting…".to_string()
        } else {
            format!("Donate ${}", two_places(self.amount()))
        }
    }

    /// Message from the most recent failed submission, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&'static str> {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit the form once. Never retries.
    pub async fn submit(&self) -> Result<FlowOutcome, FlowError> {
        let result = self.submit_once().await;
        let message = result.as_ref().err().map(FlowError::user_message);
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message;
        result
    }

    async fn submit_once(&self) -> Result<FlowOutcome, FlowError> {
        let amount = self.amount();
        if amount <= Decimal::ZERO {
            return Err(FlowError::InvalidAmount);
        }

        match self.method {
            PaymentMethod::AlternateProvider => {
                let client_id = self
                    .alternate_client_id
                    .clone()
                    .ok_or(FlowError::AlternateNotConfigured)?;
                Ok(FlowOutcome::AlternateButton {
                    client_id,
                    value: two_places(amount),
                    currency: ALTERNATE_CURRENCY,
                    description: ALTERNATE_DESCRIPTION,
                })
            }
            PaymentMethod::Card => {
                let _guard = InFlightGuard::acquire(&self.in_flight)?;

                let mut request = CreateDonationRequest::new(amount);
                request.name = self.donor_name.clone();

                let session = self.backend.create_donation(&request).await?;
                let url = Url::parse(&session.checkout_url)?;
                Ok(FlowOutcome::Redirect(url))
            }
        }
    }
}

fn two_places(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Clears the in-flight flag when the submission finishes, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, FlowError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| FlowError::InFlight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
