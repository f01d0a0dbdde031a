//! Donation request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/donations`.
///
/// `amount` is kept as a raw JSON value: browsers send numbers, numeric
/// strings, or garbage, and the server decides which of those is a valid
/// amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDonationRequest {
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreateDonationRequest {
    /// Build a request for `amount` major units with the default currency.
    pub fn new(amount: Decimal) -> Self {
        let amount = amount
            .normalize()
            .to_string()
            .parse::<serde_json::Number>()
            .map(serde_json::Value::Number)
            .unwrap_or_else(|_| serde_json::Value::String(amount.to_string()));
        Self {
            amount,
            currency: None,
            name: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Response of a successful `POST /api/donations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub checkout_url: String,
}

/// A completed donation as listed by `GET /api/donations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub id: String,
    /// Amount in major currency units.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    /// Donor email, or `"Anonymous"` when the provider has none.
    pub donor: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}
