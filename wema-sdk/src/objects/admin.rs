//! Admin API request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/admin/login`. Missing fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    /// Bearer token for the other admin endpoints.
    pub token: String,
}

/// Rejection body of `POST /api/admin/login` and of unauthenticated admin calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAuthFailure {
    pub message: String,
}

/// A provider payment as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPayment {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Upper-case ISO-4217 code.
    pub currency: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

/// Aggregate over the most recent succeeded payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_donations: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}
