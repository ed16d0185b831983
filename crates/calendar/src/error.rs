//! Error types for the tellus-calendar crate.

use chrono::NaiveDateTime;

/// Error type for all fallible operations in the tellus-calendar crate.
///
/// Covers inverted time ranges and date labels that cannot be represented
/// on the Gregorian calendar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when the end of a range precedes its start.
    #[error("invalid range: end {end} precedes start {start}")]
    InvalidRange {
        /// Start of the offending range, normalized to noon.
        start: NaiveDateTime,
        /// End of the offending range, normalized to noon.
        end: NaiveDateTime,
    },

    /// Returned when a date label has no Gregorian representation.
    #[error("invalid date: {reason}")]
    InvalidDate {
        /// Description of the unrepresentable date.
        reason: String,
    },
}
