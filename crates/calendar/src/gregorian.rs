//! Gregorian daily-index reconstruction.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::CalendarError;
use crate::sequence::{daily_noon_sequence, noon_of};

/// First day on which the model clock and the Gregorian calendar agree
/// again: 1900-03-01. Runs starting before this date span the Julian
/// leap day 1900-02-29, which the Gregorian calendar lacks.
pub fn leap_discontinuity_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 3, 1).expect("1900-03-01 is a valid date")
}

/// Reconstructs an evenly-spaced daily Gregorian index from the first and
/// last timestamps of a model time axis.
///
/// Both endpoints are normalized to noon of their calendar day. When the
/// start falls before [`leap_discontinuity_cutoff`], the end is extended
/// by one day: the model's Julian clock counts 1900-02-29 as a timestep
/// while the Gregorian sequence skips it, so the Gregorian labels of all
/// later days slide forward by one.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidRange`] if the end precedes the start
/// after correction.
pub fn gregorian_daily_index(
    first_raw: NaiveDateTime,
    last_raw: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>, CalendarError> {
    let start = noon_of(first_raw);
    let mut end = noon_of(last_raw);

    if start.date() < leap_discontinuity_cutoff() {
        end += TimeDelta::days(1);
    }

    if end < start {
        return Err(CalendarError::InvalidRange { start, end });
    }

    let n_days = (end.date() - start.date()).num_days() as usize + 1;
    Ok(daily_noon_sequence(start.date(), n_days))
}
