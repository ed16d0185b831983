//! Accessor for model output diagnostic histories.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::catalog::VariableDescriptor;
use crate::classify::classify;
use crate::config::DataRoots;
use crate::error::DatasetError;
use crate::handle::DatasetHandle;
use crate::paths::ModelRun;
use crate::table::DataTable;

/// Daily land diagnostic; its time axis needs Gregorian reconstruction.
const DIAG_DAILY: &str = "land_daily";
/// Monthly land diagnostic; its time axis passes through as decoded.
const DIAG_MONTHLY: &str = "land_month";

/// Accessor over one model run's diagnostic history directory.
///
/// Diagnostic files are opened lazily on first use and cached for the
/// accessor's lifetime; at most one handle is open per diagnostic name.
/// Call [`close`](Self::close) to release every cached handle.
pub struct ModelOutputAccessor {
    run: ModelRun,
    history_dir: PathBuf,
    diagnostics: BTreeMap<String, DatasetHandle>,
}

impl ModelOutputAccessor {
    /// Creates an accessor for one run.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Configuration`] when the model output root
    /// is not set. The history directory itself is not touched until a
    /// diagnostic is opened.
    pub fn new(
        roots: &DataRoots,
        site: &str,
        forcing_id: &str,
        version: &str,
        spinup: bool,
    ) -> Result<Self, DatasetError> {
        let root = roots.require_output()?;
        let run = ModelRun::new(site, forcing_id, version, spinup);
        let history_dir = run.history_dir(root);
        Ok(Self {
            run,
            history_dir,
            diagnostics: BTreeMap::new(),
        })
    }

    /// Identity of the run this accessor reads.
    pub fn run(&self) -> &ModelRun {
        &self.run
    }

    /// Opens (or returns the cached handle for) a diagnostic.
    ///
    /// History files are named `<start date>.<diagnostic>.nc`; the first
    /// file in sorted directory order whose name ends with
    /// `<diagnostic>.nc` wins. Callers with several matching files per
    /// diagnostic get the lexicographically first one.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] when the history directory or
    /// the diagnostic file is absent.
    pub fn open_diagnostic(&mut self, diagnostic: &str) -> Result<&DatasetHandle, DatasetError> {
        if !self.diagnostics.contains_key(diagnostic) {
            let path = self.find_diagnostic_file(diagnostic)?;
            let handle = DatasetHandle::open(diagnostic, &path)?;
            info!(
                diagnostic,
                path = %path.display(),
                "opened diagnostic dataset"
            );
            self.diagnostics.insert(diagnostic.to_string(), handle);
        }
        Ok(self
            .diagnostics
            .get(diagnostic)
            .expect("handle cached just above"))
    }

    /// Describes every data variable of a diagnostic.
    pub fn list_variables(
        &mut self,
        diagnostic: &str,
    ) -> Result<Vec<VariableDescriptor>, DatasetError> {
        Ok(self.open_diagnostic(diagnostic)?.variable_catalog())
    }

    /// Builds the corrected time index for a diagnostic.
    ///
    /// `land_daily` axes are reconstructed as a daily Gregorian sequence
    /// at noon, with the 1900 leap-day correction applied when the run
    /// starts before the cutoff. `land_month` axes are already
    /// Gregorian-compatible and pass through as decoded.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnsupportedDiagnostic`] for any other
    /// diagnostic name.
    pub fn gregorian_index(
        &mut self,
        diagnostic: &str,
    ) -> Result<Vec<NaiveDateTime>, DatasetError> {
        match diagnostic {
            DIAG_DAILY => {
                let handle = self.open_diagnostic(diagnostic)?;
                let (first, last, _len) = handle.time_bounds()?;
                Ok(tellus_calendar::gregorian_daily_index(first, last)?)
            }
            DIAG_MONTHLY => self.open_diagnostic(diagnostic)?.time_axis(),
            other => Err(DatasetError::UnsupportedDiagnostic {
                name: other.to_string(),
            }),
        }
    }

    /// Extracts the requested variables of a diagnostic as one table.
    ///
    /// Flat variables become single columns; depth-profile variables are
    /// pivoted into one column per depth level, named
    /// `"<variable> <depth>"` with the depth printed to two decimals.
    /// Multi-band (radiation) variables are recognized but contribute no
    /// columns. All columns share the diagnostic's corrected time index.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NoData`] when nothing in the request can
    /// be materialized, and [`DatasetError::ShapeMismatch`] when a
    /// column's length disagrees with the time index.
    pub fn get_data(
        &mut self,
        variables: &[&str],
        diagnostic: &str,
    ) -> Result<DataTable, DatasetError> {
        let catalog = self.open_diagnostic(diagnostic)?.variable_catalog();
        let groups = classify(variables, &catalog);

        if !groups.has_materializable() {
            let rejected: Vec<String> = groups
                .rejected
                .iter()
                .map(|(name, reason)| format!("{name} ({reason})"))
                .collect();
            let reason = if rejected.is_empty() {
                format!(
                    "only multi-band variables requested: {}",
                    groups.multi_band.join(", ")
                )
            } else {
                format!(
                    "all {} requested variables were rejected: {}",
                    variables.len(),
                    rejected.join(", ")
                )
            };
            return Err(DatasetError::NoData { reason });
        }

        let index = self.gregorian_index(diagnostic)?;
        let handle = self
            .diagnostics
            .get(diagnostic)
            .expect("cached by open_diagnostic");

        let mut table = DataTable::new(index);

        for name in &groups.time_series {
            let values = handle.series_at_point(name)?;
            table.push_column(name.clone(), values)?;
        }

        for (name, depth_axis) in &groups.depth_profile {
            let (depths, columns) = handle.profile_at_point(name, depth_axis)?;
            for (depth, values) in depths.iter().zip(columns) {
                table.push_column(format!("{name} {depth:.2}"), values)?;
            }
        }

        for name in &groups.multi_band {
            warn!(
                variable = name.as_str(),
                "multi-band variables are not materialized; skipping"
            );
        }

        Ok(table)
    }

    /// Releases every cached diagnostic handle. Idempotent; safe to call
    /// with no handles open.
    pub fn close(&mut self) {
        if !self.diagnostics.is_empty() {
            debug!(
                n_handles = self.diagnostics.len(),
                "closing diagnostic handles"
            );
        }
        self.diagnostics.clear();
    }

    /// Number of currently open diagnostic handles.
    pub fn n_open_handles(&self) -> usize {
        self.diagnostics.len()
    }

    fn find_diagnostic_file(&self, diagnostic: &str) -> Result<PathBuf, DatasetError> {
        let entries = fs::read_dir(&self.history_dir).map_err(|_| DatasetError::NotFound {
            what: format!("history directory for run '{}'", self.run.dir_name()),
            path: self.history_dir.clone(),
        })?;

        let suffix = format!("{diagnostic}.nc");
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        names
            .into_iter()
            .find(|name| name.ends_with(&suffix))
            .map(|name| self.history_dir.join(name))
            .ok_or_else(|| DatasetError::NotFound {
                what: format!("diagnostic '{diagnostic}'"),
                path: self.history_dir.clone(),
            })
    }
}
