//! Julian-calendar day arithmetic.
//!
//! The model writes its time axis as day offsets from a base date label,
//! counted on the Julian calendar (leap year every fourth year, so
//! 1900-02-29 exists). These helpers advance a base label by a day count
//! without ever leaving the Julian calendar. The day-number pivot is the
//! standard integer algorithm; only differences of day numbers are
//! meaningful here.

/// Converts a Julian-calendar date to its day number.
pub fn julian_day_number(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - 32083
}

/// Converts a day number back to a Julian-calendar `(year, month, day)`.
pub fn julian_date_from_number(jdn: i64) -> (i64, i64, i64) {
    let c = jdn + 32082;
    let d = (4 * c + 3) / 1461;
    let e = c - 1461 * d / 4;
    let m = (5 * e + 2) / 153;

    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = d - 4800 + m / 10;

    (year, month, day)
}

/// Advances a Julian-calendar date label by `days` (which may be negative).
pub fn julian_label_add(year: i64, month: i64, day: i64, days: i64) -> (i64, i64, i64) {
    julian_date_from_number(julian_day_number(year, month, day) + days)
}
