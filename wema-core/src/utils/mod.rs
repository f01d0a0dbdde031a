pub mod rate_limit;

/// Convert a provider unix timestamp (seconds) to a date-time.
///
/// Out-of-range values collapse to the epoch rather than failing a listing.
pub fn from_unix_seconds(seconds: i64) -> time::OffsetDateTime {
    time::OffsetDateTime::from_unix_timestamp(seconds).unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
}
