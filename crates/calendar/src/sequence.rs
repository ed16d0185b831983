//! Noon normalization and daily noon sequences.

use chrono::{NaiveDate, NaiveDateTime};

/// Normalizes a timestamp to 12:00:00 of its calendar day.
pub fn noon_of(ts: NaiveDateTime) -> NaiveDateTime {
    noon(ts.date())
}

/// Generates `n_days` consecutive daily timestamps at local noon.
///
/// Starting from noon of `start_day`, produces exactly `n_days` entries by
/// repeatedly advancing to the next day. Month and year boundaries are
/// handled by chrono.
///
/// # Example
///
/// ```ignore
/// let start = NaiveDate::from_ymd_opt(2000, 12, 30).unwrap();
/// let stamps = daily_noon_sequence(start, 4);
/// assert_eq!(stamps.len(), 4);
/// // Dec 30, Dec 31, Jan 1 (2001), Jan 2 (2001), all at 12:00
/// ```
pub fn daily_noon_sequence(start_day: NaiveDate, n_days: usize) -> Vec<NaiveDateTime> {
    let mut stamps = Vec::with_capacity(n_days);
    let mut current = start_day;
    for _ in 0..n_days {
        stamps.push(noon(current));
        current = current
            .succ_opt()
            .expect("daily sequences stay far from chrono's representable bounds");
    }
    stamps
}

fn noon(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(12, 0, 0)
        .expect("noon is valid on every calendar day")
}
