//! Request processors.
//!
//! Each processor implements [`kanau::processor::Processor`] for the
//! commands it handles. Handlers build a processor per request from the
//! shared state and call `process` with the command.
//!
//! - `DonationProcessor`: `CreateDonation` → hosted checkout session
//! - `ReportingProcessor`: `ListDonations`, `ListAdminPayments`, `ComputeDonationStats`
//! - `ContactProcessor`: `ContactMessage` → acknowledgement

pub mod contact;
pub mod donation;
pub mod reporting;

pub use contact::{CONTACT_ACK_MESSAGE, ContactError, ContactProcessor};
pub use donation::{CreateDonation, DonationError, DonationProcessor, DonationStage};
pub use reporting::{
    ADMIN_PAYMENTS_PAGE_SIZE, ComputeDonationStats, DONATIONS_PAGE_SIZE, ListAdminPayments,
    ListDonations, ReportingProcessor, STATS_PAGE_SIZE,
};
