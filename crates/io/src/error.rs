//! Error types for tellus-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the tellus-io crate.
///
/// Covers configuration gaps caught at accessor construction, missing
/// files and variables, caller precondition violations, shape-invariant
/// violations during table assembly, and failures surfaced by the NetCDF,
/// CSV, and calendar collaborators.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Returned when a required base path or site mapping is not
    /// configured. Fatal at accessor construction.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Description of the missing configuration.
        reason: String,
    },

    /// Returned when a requested file, diagnostic, or variable is absent.
    #[error("{what} not found: {}", path.display())]
    NotFound {
        /// What was being looked for.
        what: String,
        /// Path that was searched.
        path: PathBuf,
    },

    /// Returned when a caller-supplied parameter violates a documented
    /// precondition.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the violated precondition.
        reason: String,
    },

    /// Returned when a diagnostic is not one of the two known kinds.
    #[error("diagnostic '{name}' is not supported (known kinds: land_daily, land_month)")]
    UnsupportedDiagnostic {
        /// The unrecognized diagnostic name.
        name: String,
    },

    /// Returned when an assembled column's row count disagrees with the
    /// shared time index.
    #[error("shape mismatch for {name}: expected {expected} rows, got {got}")]
    ShapeMismatch {
        /// Name of the offending column or dimension.
        name: String,
        /// Expected row count.
        expected: usize,
        /// Actual row count.
        got: usize,
    },

    /// Returned when every requested variable was rejected.
    #[error("no usable variables: {reason}")]
    NoData {
        /// Summary of why nothing could be materialized.
        reason: String,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the CSV parser.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the tellus-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Returned when a time axis cannot be decoded.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time decoding issue.
        reason: String,
    },
}

impl From<netcdf::Error> for DatasetError {
    fn from(e: netcdf::Error) -> Self {
        DatasetError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<tellus_calendar::CalendarError> for DatasetError {
    fn from(e: tellus_calendar::CalendarError) -> Self {
        DatasetError::Calendar {
            reason: e.to_string(),
        }
    }
}
