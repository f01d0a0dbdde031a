use rust_decimal::Decimal;
use thiserror::Error;
use time::OffsetDateTime;

use crate::amount::{Currency, ValidatedDonation};
use crate::provider::CheckoutSession;

/// A donation as it would be persisted. The live flow keeps no records;
/// the provider's own session list is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRecord {
    pub amount: Decimal,
    pub currency: Currency,
    pub donor_email: Option<String>,
    pub donor_name: Option<String>,
    pub method: DonationMethod,
    pub external_session_id: String,
    pub status: DonationStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DonationMethod {
    Card,
    AlternateProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("donation is already {0:?}")]
    AlreadySettled(DonationStatus),
}

impl DonationRecord {
    /// A `Pending` card donation for a freshly created checkout session.
    pub fn pending_from_session(
        donation: &ValidatedDonation,
        session: &CheckoutSession,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            amount: donation.amount(),
            currency: donation.currency().clone(),
            donor_email: None,
            donor_name: donation.donor_name().map(str::to_owned),
            method: DonationMethod::Card,
            external_session_id: session.session_id.clone(),
            status: DonationStatus::Pending,
            created_at,
        }
    }

    pub fn complete(&mut self, donor_email: Option<String>) -> Result<(), RecordError> {
        self.settle(DonationStatus::Completed)?;
        if donor_email.is_some() {
            self.donor_email = donor_email;
        }
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), RecordError> {
        self.settle(DonationStatus::Failed)
    }

    fn settle(&mut self, to: DonationStatus) -> Result<(), RecordError> {
        match self.status {
            DonationStatus::Pending => {
                self.status = to;
                Ok(())
            }
            settled => Err(RecordError::AlreadySettled(settled)),
        }
    }
}
