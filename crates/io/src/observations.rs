//! Accessor for monitoring-network sensor observations.
//!
//! Each site directory holds one delimited text file per sensor variable,
//! named `LR_<abbrev>_C_<variable>_SourceID_1_QC_1.csv`. Files start with
//! free-form metadata rows; the data begins at the header row containing
//! the `LocalDateTime` column. Sensor clocks run on local time; every
//! timestamp is shifted by the site's configured UTC offset on the way
//! out.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, warn};

use crate::config::{DataRoots, SiteInfo, SiteRegistry};
use crate::error::DatasetError;
use crate::paths::normalize_site;
use crate::table::DataSeries;

/// Column name marking the header row of an observation file.
const HEADER_MARKER: &str = "LocalDateTime";

/// Trailing file-name segment shared by every observation file.
const FILE_SUFFIX: &str = "_SourceID_1_QC_1.csv";

/// Timestamp layouts seen in the monitoring network's exports, tried in
/// order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Accessor over one monitoring site's observation files.
///
/// The site must be present in the [`SiteRegistry`]; both the registry
/// entry and the observation root are checked at construction.
pub struct ObservationAccessor {
    site: String,
    site_dir: PathBuf,
    info: SiteInfo,
}

impl ObservationAccessor {
    /// Creates an accessor for one site.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Configuration`] when the observation root
    /// is not set or the site has no registry entry.
    pub fn new(
        roots: &DataRoots,
        registry: &SiteRegistry,
        site: &str,
    ) -> Result<Self, DatasetError> {
        let root = roots.require_observations()?;
        let info = registry
            .get(site)
            .ok_or_else(|| DatasetError::Configuration {
                reason: format!("site '{site}' has no abbreviation mapping"),
            })?
            .clone();

        Ok(Self {
            site: site.to_string(),
            site_dir: root.join(normalize_site(site)),
            info,
        })
    }

    /// Site name this accessor reads.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Lists the site's observation file names in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] when the site directory is
    /// absent.
    pub fn list_files(&self) -> Result<Vec<String>, DatasetError> {
        let entries = fs::read_dir(&self.site_dir).map_err(|_| DatasetError::NotFound {
            what: format!("observation directory for site '{}'", self.site),
            path: self.site_dir.clone(),
        })?;

        let prefix = format!("LR_{}_C", self.info.abbreviation);
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix) && name.ends_with(".csv"))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Derives the site's variable names from its file names. Duplicates
    /// collapse; the resulting order is unspecified.
    pub fn list_variables(&self) -> Result<Vec<String>, DatasetError> {
        let prefix = format!("LR_{}_C_", self.info.abbreviation);
        let variables: BTreeSet<String> = self
            .list_files()?
            .iter()
            .filter_map(|name| variable_from_file_name(name, &prefix))
            .collect();
        Ok(variables.into_iter().collect())
    }

    /// Loads one variable's observations as a UTC-shifted time series.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] when the variable's file is
    /// absent and [`DatasetError::Csv`] when the file has no header row
    /// or no column named after the variable.
    pub fn get_data(&self, variable: &str) -> Result<DataSeries, DatasetError> {
        let file_name = format!(
            "LR_{}_C_{variable}{FILE_SUFFIX}",
            self.info.abbreviation
        );
        let path = self.site_dir.join(&file_name);
        if !path.exists() {
            return Err(DatasetError::NotFound {
                what: format!("observation file for variable '{variable}'"),
                path,
            });
        }

        let raw = fs::read_to_string(&path).map_err(|e| DatasetError::Csv {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        let body = skip_to_header(&raw).ok_or_else(|| DatasetError::Csv {
            reason: format!("no '{HEADER_MARKER}' header row in {}", path.display()),
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let time_col = headers
            .iter()
            .position(|h| h.trim() == HEADER_MARKER)
            .ok_or_else(|| DatasetError::Csv {
                reason: format!("header row lacks a '{HEADER_MARKER}' column"),
            })?;
        let value_col = headers
            .iter()
            .position(|h| h.trim() == variable)
            .ok_or_else(|| DatasetError::Csv {
                reason: format!("no column '{variable}' in {file_name}"),
            })?;

        let shift = TimeDelta::hours(self.info.utc_offset_hours);
        let mut index = Vec::new();
        let mut values = Vec::new();
        let mut n_skipped = 0usize;

        for (row_number, record) in reader.records().enumerate() {
            let record = record?;
            let parsed = record
                .get(time_col)
                .and_then(parse_local_timestamp)
                .zip(record.get(value_col).and_then(|v| v.trim().parse::<f64>().ok()));

            match parsed {
                Some((ts, value)) => {
                    index.push(ts + shift);
                    values.push(value);
                }
                None => {
                    debug!(row = row_number, "skipping unparseable observation row");
                    n_skipped += 1;
                }
            }
        }

        if n_skipped > 0 {
            warn!(
                variable,
                n_skipped, "skipped observation rows with unparseable timestamps or values"
            );
        }

        DataSeries::new(variable, index, values)
    }
}

/// Slices off the metadata preamble, returning the file content from the
/// header row onward, or `None` when no header row exists.
fn skip_to_header(raw: &str) -> Option<&str> {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if line.contains(HEADER_MARKER) {
            return Some(&raw[offset..]);
        }
        offset += line.len();
    }
    None
}

/// Extracts the variable name from an observation file name by stripping
/// the site prefix and the fixed suffix.
fn variable_from_file_name(name: &str, prefix: &str) -> Option<String> {
    name.strip_prefix(prefix)?
        .strip_suffix(FILE_SUFFIX)
        .map(str::to_string)
}

/// Parses a sensor timestamp, trying each known layout in order.
fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
