//! Accessor for atmospheric forcing files.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::catalog::VariableDescriptor;
use crate::config::DataRoots;
use crate::error::DatasetError;
use crate::handle::DatasetHandle;
use crate::paths::ModelRun;
use crate::table::DataSeries;

/// Suffixes tried, in order, when looking up a variable's QC-flag
/// companion.
const FLAG_SUFFIXES: &[&str] = &["_flag", "_qc"];

/// Length of one spin-up forcing cycle in years.
const CYCLE_YEARS: u32 = 10;

/// Accessor over one model run's forcing file.
///
/// The file is opened eagerly at construction and held until the
/// accessor is closed or dropped. Forcing time axes are already usable
/// as-is; no Gregorian reconstruction is applied.
pub struct ForcingAccessor {
    run: ModelRun,
    handle: DatasetHandle,
}

impl ForcingAccessor {
    /// Opens the forcing file for one run.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Configuration`] when the forcing root is
    /// not set and [`DatasetError::NotFound`] when the file is absent.
    pub fn open(
        roots: &DataRoots,
        site: &str,
        forcing_id: &str,
        version: &str,
        spinup: bool,
    ) -> Result<Self, DatasetError> {
        let root = roots.require_forcing()?;
        let run = ModelRun::new(site, forcing_id, version, spinup);
        let path = run.forcing_file(root);
        let handle = DatasetHandle::open(run.dir_name(), &path)?;
        info!(path = %path.display(), "opened forcing dataset");
        Ok(Self { run, handle })
    }

    /// Identity of the run this accessor reads.
    pub fn run(&self) -> &ModelRun {
        &self.run
    }

    /// Describes every data variable in the forcing file.
    pub fn list_variables(&self) -> Vec<VariableDescriptor> {
        self.handle.variable_catalog()
    }

    /// Extracts one variable at the file's single spatial point, indexed
    /// by the native time axis.
    pub fn get_data(&self, name: &str) -> Result<DataSeries, DatasetError> {
        let index = self.handle.time_axis()?;
        let values = self.handle.series_at_point(name)?;
        DataSeries::new(name, index, values)
    }

    /// Extracts the QC-flag companion of a variable.
    ///
    /// Not every variable carries flags; absence is not an error and
    /// yields an empty series.
    pub fn get_flags(&self, name: &str) -> Result<DataSeries, DatasetError> {
        for suffix in FLAG_SUFFIXES {
            let flag_name = format!("{name}{suffix}");
            if self.handle.has_variable(&flag_name) {
                let index = self.handle.time_axis()?;
                let values = self.handle.series_at_point(&flag_name)?;
                return DataSeries::new(flag_name, index, values);
            }
        }
        debug!(variable = name, "no QC flags in forcing file");
        Ok(DataSeries::empty(format!("{name}_flag")))
    }

    /// Approximates the looped spin-up forcing the model drives itself
    /// with: the source series is resampled to daily means, the final day
    /// is dropped (each cycle's last day coincides with the next cycle's
    /// first), and the remainder is tiled once per decade of spin-up.
    /// The result is reindexed as a contiguous daily noon sequence whose
    /// first day is the source's first day moved back by `spin_up_years`
    /// relative to the source's last year.
    ///
    /// The model itself loops by interpolation; this concatenation is an
    /// approximation, not a bit-for-bit reproduction.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidArgument`] unless `spin_up_years`
    /// is a positive multiple of 10, and [`DatasetError::NoData`] when
    /// the source series is too short to loop.
    pub fn get_looped_series(
        &self,
        name: &str,
        spin_up_years: u32,
    ) -> Result<DataSeries, DatasetError> {
        if spin_up_years == 0 || spin_up_years % CYCLE_YEARS != 0 {
            return Err(DatasetError::InvalidArgument {
                reason: format!(
                    "spin-up years must be a positive multiple of {CYCLE_YEARS}, got {spin_up_years}"
                ),
            });
        }

        let source = self.get_data(name)?;
        let (days, means) = daily_mean(source.index(), source.values());
        if days.len() < 2 {
            return Err(DatasetError::NoData {
                reason: format!("variable '{name}' has too few samples to loop"),
            });
        }

        let cycle = &means[..means.len() - 1];
        let n_cycles = (spin_up_years / CYCLE_YEARS) as usize;
        let mut values = Vec::with_capacity(cycle.len() * n_cycles);
        for _ in 0..n_cycles {
            values.extend_from_slice(cycle);
        }

        let last_day = days[days.len() - 1];
        let start_year = last_day.year() - spin_up_years as i32;
        let start_day =
            days[0]
                .with_year(start_year)
                .ok_or_else(|| DatasetError::InvalidTime {
                    reason: format!("cannot place {} in year {start_year}", days[0]),
                })?;

        let index = tellus_calendar::daily_noon_sequence(start_day, values.len());
        DataSeries::new(name, index, values)
    }

    /// Releases the forcing file handle.
    pub fn close(self) {
        drop(self);
    }
}

/// Collapses a (possibly sub-daily) series into per-day means. The input
/// is assumed time-ordered, as forcing axes are; each run of samples
/// sharing a calendar day yields one output value.
fn daily_mean(index: &[NaiveDateTime], values: &[f64]) -> (Vec<NaiveDate>, Vec<f64>) {
    let mut days = Vec::new();
    let mut means = Vec::new();

    let mut current: Option<NaiveDate> = None;
    let mut sum = 0.0;
    let mut count = 0usize;

    for (ts, &value) in index.iter().zip(values) {
        let day = ts.date();
        if current != Some(day) {
            if let Some(prev) = current {
                days.push(prev);
                means.push(sum / count as f64);
            }
            current = Some(day);
            sum = 0.0;
            count = 0;
        }
        sum += value;
        count += 1;
    }

    if let Some(prev) = current {
        days.push(prev);
        means.push(sum / count as f64);
    }

    (days, means)
}
