pub mod donation_record;

pub use donation_record::{DonationMethod, DonationRecord, DonationStatus, RecordError};
