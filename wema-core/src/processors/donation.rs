//! Donation checkout orchestration.
//!
//! A donation moves through
//! `Received → Validated → SessionRequested → SessionCreated`, or stops at
//! `Rejected` (bad input, no provider call) or `Failed` (provider error).
//! Nothing is stored locally at any stage, so a failed attempt leaves no
//! state behind.

use std::fmt;
use std::sync::Arc;

use kanau::processor::Processor;
use thiserror::Error;
use tracing::{debug, info, warn};
use wema_sdk::objects::CreateDonationRequest;

use crate::amount::{AmountError, validate_donation};
use crate::config::FrontendConfig;
use crate::provider::{CheckoutProvider, CheckoutSession, ProviderError};
use crate::session::build_session_spec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStage {
    Received,
    Validated,
    SessionRequested,
    SessionCreated,
    Rejected,
    Failed,
}

impl fmt::Display for DonationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DonationStage::Received => "received",
            DonationStage::Validated => "validated",
            DonationStage::SessionRequested => "session_requested",
            DonationStage::SessionCreated => "session_created",
            DonationStage::Rejected => "rejected",
            DonationStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum DonationError {
    #[error("invalid donation: {0}")]
    Invalid(#[from] AmountError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl DonationError {
    /// The stage the donation ended in.
    pub fn stage(&self) -> DonationStage {
        match self {
            DonationError::Invalid(_) => DonationStage::Rejected,
            DonationError::Provider(_) => DonationStage::Failed,
        }
    }
}

/// Command: start a hosted checkout for a donation.
#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub request: CreateDonationRequest,
    pub idempotency_key: Option<String>,
}

/// Validates donations and opens checkout sessions with the provider.
pub struct DonationProcessor {
    pub provider: Arc<dyn CheckoutProvider>,
    pub frontend: FrontendConfig,
}

impl Processor<CreateDonation> for DonationProcessor {
    type Output = CheckoutSession;
    type Error = DonationError;

    async fn process(&self, command: CreateDonation) -> Result<CheckoutSession, DonationError> {
        debug!(stage = %DonationStage::Received, "Donation received");

        let donation = validate_donation(&command.request).inspect_err(|e| {
            info!(stage = %DonationStage::Rejected, reason = %e, "Donation rejected");
        })?;
        debug!(
            stage = %DonationStage::Validated,
            minor_units = donation.minor_units(),
            currency = %donation.currency(),
            "Donation validated"
        );

        let spec = build_session_spec(&donation, &self.frontend, command.idempotency_key);
        debug!(stage = %DonationStage::SessionRequested, "Requesting checkout session");

        let session = self.provider.create_session(&spec).await.inspect_err(|e| {
            warn!(stage = %DonationStage::Failed, error = %e, "Checkout session creation failed");
        })?;

        info!(
            stage = %DonationStage::SessionCreated,
            session_id = %session.session_id,
            minor_units = donation.minor_units(),
            "Checkout session created"
        );
        Ok(session)
    }
}
