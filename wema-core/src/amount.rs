//! Donation amount and currency validation.
//!
//! Everything the browser sends is untrusted. An amount is accepted only if
//! it is a JSON number or numeric string that is strictly positive and still
//! payable once converted to minor units. Conversion to minor units happens
//! here, exactly once, and the result travels with the validated donation.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use thiserror::Error;
use wema_sdk::objects::CreateDonationRequest;

/// Currency used when the request does not name one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Minor units per major unit. Every supported currency uses two decimals.
const MINOR_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is missing")]
    Missing,
    #[error("amount is not a number: {0}")]
    NotNumeric(String),
    #[error("amount must be greater than zero, got {0}")]
    NotPositive(Decimal),
    #[error("amount {0} rounds to zero minor units")]
    BelowMinorUnit(Decimal),
    #[error("amount {0} is too large")]
    TooLarge(Decimal),
}

/// Lower-case ISO-4217 code, passed through to the provider unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Normalize an optional client-supplied code. Blank means default.
    pub fn from_request(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Self(code.to_ascii_lowercase()),
            None => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A donation that passed validation and is safe to send to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDonation {
    amount: Decimal,
    minor_units: i64,
    currency: Currency,
    donor_name: Option<String>,
}

impl ValidatedDonation {
    /// Amount in major units, as the donor entered it.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// `round(amount * 100)`, always >= 1.
    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Trimmed donor name, `None` if absent or blank.
    pub fn donor_name(&self) -> Option<&str> {
        self.donor_name.as_deref()
    }
}

/// Validate a raw donation request.
pub fn validate_donation(request: &CreateDonationRequest) -> Result<ValidatedDonation, AmountError> {
    let amount = parse_amount(&request.amount)?;
    let minor_units = to_minor_units(amount)?;

    Ok(ValidatedDonation {
        amount,
        minor_units,
        currency: Currency::from_request(request.currency.as_deref()),
        donor_name: request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned),
    })
}

/// Parse an untrusted JSON value into a strictly positive decimal.
pub fn parse_amount(raw: &serde_json::Value) -> Result<Decimal, AmountError> {
    let text = match raw {
        serde_json::Value::Null => return Err(AmountError::Missing),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) if s.trim().is_empty() => return Err(AmountError::Missing),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => return Err(AmountError::NotNumeric(other.to_string())),
    };

    let amount = text
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| AmountError::NotNumeric(text.clone()))?;

    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }
    Ok(amount)
}

/// Convert major units to integer minor units, rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> Result<i64, AmountError> {
    let scaled = amount
        .checked_mul(MINOR_PER_MAJOR)
        .ok_or(AmountError::TooLarge(amount))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let minor = scaled.to_i64().ok_or(AmountError::TooLarge(amount))?;
    if minor < 1 {
        return Err(AmountError::BelowMinorUnit(amount));
    }
    Ok(minor)
}

/// Convert provider minor units back to major units for display.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::from(minor) / MINOR_PER_MAJOR
}
