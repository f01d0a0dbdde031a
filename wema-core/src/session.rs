//! Hosted checkout session request construction.
//!
//! Turns a [`ValidatedDonation`] into the provider-agnostic [`SessionSpec`]
//! handed to a [`CheckoutProvider`](crate::provider::CheckoutProvider).

use crate::amount::{Currency, ValidatedDonation};
use crate::config::FrontendConfig;

/// Donor label used when no name was given.
pub const ANONYMOUS_DONOR: &str = "Anonymous";

/// Only one-off card payments are offered through hosted checkout.
pub const PAYMENT_METHOD_CARD: &str = "card";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// One-time payment.
    Payment,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Payment => "payment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Display name shown on the hosted page.
    pub name: String,
    pub currency: Currency,
    /// Price per unit in minor units.
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything the provider needs to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    pub mode: SessionMode,
    pub payment_method_types: Vec<&'static str>,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Forwarded to the provider so a retried submission reuses the session.
    pub idempotency_key: Option<String>,
}

/// `Donation from {name}` or `Donation from Anonymous`.
pub fn line_item_name(donor_name: Option<&str>) -> String {
    format!("Donation from {}", donor_name.unwrap_or(ANONYMOUS_DONOR))
}

/// Build the session spec for a validated donation.
pub fn build_session_spec(
    donation: &ValidatedDonation,
    frontend: &FrontendConfig,
    idempotency_key: Option<String>,
) -> SessionSpec {
    SessionSpec {
        mode: SessionMode::Payment,
        payment_method_types: vec![PAYMENT_METHOD_CARD],
        line_items: vec![LineItem {
            name: line_item_name(donation.donor_name()),
            currency: donation.currency().clone(),
            unit_amount: donation.minor_units(),
            quantity: 1,
        }],
        success_url: frontend.success_url(),
        cancel_url: frontend.cancel_url(),
        idempotency_key,
    }
}
