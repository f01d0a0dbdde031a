//! Read-only reporting over the provider's recent payments.
//!
//! Nothing is cached: every command re-queries the provider with a fixed
//! page size and keeps the provider's ordering (newest first). There is no
//! cursor, so only the most recent page is ever visible.

use std::sync::Arc;

use kanau::processor::Processor;
use rust_decimal::Decimal;
use wema_sdk::objects::{AdminPayment, AdminStats, DonationSummary};

use crate::amount::from_minor_units;
use crate::provider::{
    CheckoutProvider, ProviderCheckoutSession, ProviderError, ProviderPaymentIntent,
};
use crate::session::ANONYMOUS_DONOR;
use crate::utils::from_unix_seconds;

/// Page size of the public donation listing.
pub const DONATIONS_PAGE_SIZE: u32 = 20;
/// Page size of the admin payment listing.
pub const ADMIN_PAYMENTS_PAGE_SIZE: u32 = 50;
/// Number of recent payments the admin stats are computed over.
pub const STATS_PAGE_SIZE: u32 = 100;

/// Command: paid checkout sessions projected for the public listing.
#[derive(Debug, Clone, Copy)]
pub struct ListDonations {
    pub limit: u32,
}

impl Default for ListDonations {
    fn default() -> Self {
        Self {
            limit: DONATIONS_PAGE_SIZE,
        }
    }
}

/// Command: recent payment intents for the admin dashboard.
#[derive(Debug, Clone, Copy)]
pub struct ListAdminPayments {
    pub limit: u32,
}

impl Default for ListAdminPayments {
    fn default() -> Self {
        Self {
            limit: ADMIN_PAYMENTS_PAGE_SIZE,
        }
    }
}

/// Command: count and total of recent succeeded payment intents.
#[derive(Debug, Clone, Copy)]
pub struct ComputeDonationStats {
    pub limit: u32,
}

impl Default for ComputeDonationStats {
    fn default() -> Self {
        Self {
            limit: STATS_PAGE_SIZE,
        }
    }
}

pub struct ReportingProcessor {
    pub provider: Arc<dyn CheckoutProvider>,
}

fn to_summary(session: ProviderCheckoutSession) -> DonationSummary {
    DonationSummary {
        amount: from_minor_units(session.amount_total.unwrap_or_default()),
        currency: session.currency.unwrap_or_default(),
        donor: session
            .customer_email
            .unwrap_or_else(|| ANONYMOUS_DONOR.to_string()),
        created_at: from_unix_seconds(session.created),
        id: session.id,
    }
}

fn to_admin_payment(intent: ProviderPaymentIntent) -> AdminPayment {
    AdminPayment {
        amount: from_minor_units(intent.amount_received),
        currency: intent.currency.to_uppercase(),
        created_at: from_unix_seconds(intent.created),
        id: intent.id,
        status: intent.status,
    }
}

impl Processor<ListDonations> for ReportingProcessor {
    type Output = Vec<DonationSummary>;
    type Error = ProviderError;

    #[tracing::instrument(skip_all, err, name = "Reporting:ListDonations")]
    async fn process(&self, query: ListDonations) -> Result<Vec<DonationSummary>, ProviderError> {
        let sessions = self.provider.list_checkout_sessions(query.limit).await?;
        Ok(sessions
            .into_iter()
            .filter(ProviderCheckoutSession::is_paid)
            .map(to_summary)
            .collect())
    }
}

impl Processor<ListAdminPayments> for ReportingProcessor {
    type Output = Vec<AdminPayment>;
    type Error = ProviderError;

    #[tracing::instrument(skip_all, err, name = "Reporting:ListAdminPayments")]
    async fn process(&self, query: ListAdminPayments) -> Result<Vec<AdminPayment>, ProviderError> {
        let intents = self.provider.list_payment_intents(query.limit).await?;
        Ok(intents.into_iter().map(to_admin_payment).collect())
    }
}

impl Processor<ComputeDonationStats> for ReportingProcessor {
    type Output = AdminStats;
    type Error = ProviderError;

    #[tracing::instrument(skip_all, err, name = "Reporting:ComputeDonationStats")]
    async fn process(&self, query: ComputeDonationStats) -> Result<AdminStats, ProviderError> {
        let intents = self.provider.list_payment_intents(query.limit).await?;
        let (count, minor_total) = intents
            .iter()
            .filter(|p| p.is_succeeded())
            .fold((0u64, 0i64), |(count, total), p| {
                (count + 1, total.saturating_add(p.amount_received))
            });

        Ok(AdminStats {
            total_donations: count,
            total_amount: if count == 0 {
                Decimal::ZERO
            } else {
                from_minor_units(minor_total)
            },
        })
    }
}
