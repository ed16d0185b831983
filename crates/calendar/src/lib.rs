//! # tellus-calendar
//!
//! Pure date arithmetic for reconstructing usable Gregorian time indexes
//! from land-surface model output.
//!
//! The model clocks its runs on the Julian calendar, which keeps
//! February 29 in 1900; the Gregorian calendar does not. A daily run that
//! starts before 1900-03-01 therefore carries one more timestep than the
//! naive Gregorian span between its endpoint labels, and
//! [`gregorian_daily_index`] compensates by extending the end of the
//! reconstructed sequence by one day. The patch is deliberately narrow:
//! it is not a general calendar-conversion algorithm.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use tellus_calendar::gregorian_daily_index;
//!
//! let first = NaiveDate::from_ymd_opt(1925, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let last = NaiveDate::from_ymd_opt(1925, 1, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let index = gregorian_daily_index(first, last)?;
//! assert_eq!(index.len(), 10);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `sequence` | Noon normalization and daily noon sequences |
//! | `gregorian` | Gregorian daily-index reconstruction with the 1900 patch |
//! | `julian` | Julian-calendar day arithmetic for time-axis labels |
//! | `error` | Error types |

mod error;
mod gregorian;
mod julian;
mod sequence;

pub use error::CalendarError;
pub use gregorian::{gregorian_daily_index, leap_discontinuity_cutoff};
pub use julian::{julian_date_from_number, julian_day_number, julian_label_add};
pub use sequence::{daily_noon_sequence, noon_of};
