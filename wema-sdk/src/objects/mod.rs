pub mod admin;
pub mod contact;
pub mod donation;

pub use admin::{AdminLoginRequest, AdminLoginResponse, AdminPayment, AdminStats};
pub use contact::{ContactAck, ContactMessage};
pub use donation::{CheckoutSessionResponse, CreateDonationRequest, DonationSummary};

use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Names of the offending request fields, when the error is about input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }

    pub fn with_fields(error: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            error: error.into(),
            fields: Some(fields),
        }
    }
}

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
}
