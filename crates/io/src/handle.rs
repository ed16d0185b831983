//! Open dataset handles over NetCDF files.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use netcdf::AttributeValue;
use tellus_calendar::julian_label_add;

use crate::catalog::{TIME_AXIS, VariableDescriptor};
use crate::error::DatasetError;

/// An opened backing store for one diagnostic or forcing file.
///
/// A handle is owned exclusively by the accessor that opened it and is
/// released when the accessor closes or drops it. The underlying file
/// stays open for the handle's lifetime.
pub struct DatasetHandle {
    key: String,
    path: PathBuf,
    file: netcdf::File,
}

impl std::fmt::Debug for DatasetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetHandle")
            .field("key", &self.key)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Decoded CF time metadata of a file's `time` variable.
struct TimeUnits {
    /// Seconds per unit step (86400 for `days since`, 3600 for `hours
    /// since`, ...).
    step_seconds: f64,
    /// Base timestamp the offsets count from.
    base: NaiveDateTime,
    /// Lowercased `calendar` attribute, defaulting to `standard`.
    calendar: String,
}

impl DatasetHandle {
    /// Opens the file at `path`, returning [`DatasetError::NotFound`] if
    /// the path does not exist on disk.
    pub fn open(key: impl Into<String>, path: &Path) -> Result<Self, DatasetError> {
        let key = key.into();
        if !path.exists() {
            return Err(DatasetError::NotFound {
                what: format!("dataset '{key}'"),
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            key,
            path: path.to_path_buf(),
            file: netcdf::open(path)?,
        })
    }

    /// Identifying key (diagnostic name or file stem).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the opened file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when the file contains the named variable.
    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Describes every data variable in the file.
    ///
    /// Coordinate variables (a 1-D variable named after its own
    /// dimension, like `time` or `zfull_soil`) are omitted; companion
    /// data variables such as `time_bnds` or `geolon_t` are kept.
    pub fn variable_catalog(&self) -> Vec<VariableDescriptor> {
        self.file
            .variables()
            .filter(|var| {
                let dims = var.dimensions();
                !(dims.len() == 1 && dims[0].name() == var.name())
            })
            .map(|var| VariableDescriptor {
                name: var.name(),
                dimensions: var.dimensions().iter().map(|d| d.name()).collect(),
                long_name: string_attr(&var, "long_name"),
                units: string_attr(&var, "units"),
            })
            .collect()
    }

    /// Decodes the full time axis into timestamps.
    ///
    /// Offsets landing on a calendar day the Gregorian calendar lacks
    /// (the Julian 1900-02-29) fail with [`DatasetError::InvalidTime`];
    /// use [`time_bounds`](Self::time_bounds) when only the endpoints of
    /// a leap-day-crossing axis are needed.
    pub fn time_axis(&self) -> Result<Vec<NaiveDateTime>, DatasetError> {
        let offsets = self.time_offsets()?;
        let units = self.time_units()?;
        offsets
            .iter()
            .map(|&offset| decode_offset(&units, offset))
            .collect()
    }

    /// Decodes only the first and last timestamps of the time axis,
    /// returning `(first, last, axis_length)`.
    pub fn time_bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime, usize), DatasetError> {
        let offsets = self.time_offsets()?;
        let units = self.time_units()?;

        let (&first, &last) = match (offsets.first(), offsets.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(DatasetError::InvalidTime {
                    reason: format!("time axis of '{}' is empty", self.key),
                });
            }
        };

        Ok((
            decode_offset(&units, first)?,
            decode_offset(&units, last)?,
            offsets.len(),
        ))
    }

    /// Extracts a flat variable at the single spatial point.
    ///
    /// The variable must be time-major; every non-time axis is taken at
    /// index zero.
    pub fn series_at_point(&self, var_name: &str) -> Result<Vec<f64>, DatasetError> {
        let var = self.variable(var_name)?;
        let dims = var.dimensions();
        check_time_major(var_name, dims)?;

        let nt = dims[0].len();
        let n_point: usize = dims[1..].iter().map(|d| d.len()).product();

        let data = var.get_values::<f64, _>(..)?;
        Ok((0..nt).map(|t| data[t * n_point]).collect())
    }

    /// Extracts a depth-profile variable at the single spatial point,
    /// returning the depth coordinate values and one column of length
    /// `nt` per depth level.
    pub fn profile_at_point(
        &self,
        var_name: &str,
        depth_axis: &str,
    ) -> Result<(Vec<f64>, Vec<Vec<f64>>), DatasetError> {
        let var = self.variable(var_name)?;
        let dims = var.dimensions();
        check_time_major(var_name, dims)?;

        let z_pos = dims
            .iter()
            .position(|d| d.name() == depth_axis)
            .ok_or_else(|| DatasetError::InvalidArgument {
                reason: format!("variable '{var_name}' has no '{depth_axis}' axis"),
            })?;

        let lens: Vec<usize> = dims.iter().map(|d| d.len()).collect();
        let mut strides = vec![1usize; lens.len()];
        for i in (0..lens.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * lens[i + 1];
        }

        let nt = lens[0];
        let nz = lens[z_pos];
        let data = var.get_values::<f64, _>(..)?;

        let depths = self.coordinate_values(depth_axis)?;
        if depths.len() != nz {
            return Err(DatasetError::ShapeMismatch {
                name: depth_axis.to_string(),
                expected: nz,
                got: depths.len(),
            });
        }

        let columns = (0..nz)
            .map(|z| {
                (0..nt)
                    .map(|t| data[t * strides[0] + z * strides[z_pos]])
                    .collect()
            })
            .collect();

        Ok((depths, columns))
    }

    /// Values of a 1-D coordinate variable such as a depth axis.
    fn coordinate_values(&self, name: &str) -> Result<Vec<f64>, DatasetError> {
        let var = self.variable(name)?;
        Ok(var.get_values::<f64, _>(..)?)
    }

    fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>, DatasetError> {
        self.file
            .variable(name)
            .ok_or_else(|| DatasetError::NotFound {
                what: format!("variable '{name}'"),
                path: self.path.clone(),
            })
    }

    fn time_offsets(&self) -> Result<Vec<f64>, DatasetError> {
        let var = self.variable(TIME_AXIS)?;
        Ok(var.get_values::<f64, _>(..)?)
    }

    /// Reads and parses the `units` and `calendar` attributes of the time
    /// variable. Expected format: `"<unit> since YYYY-MM-DD[ HH:MM:SS]"`.
    fn time_units(&self) -> Result<TimeUnits, DatasetError> {
        let var = self.variable(TIME_AXIS)?;

        let units_str = match var.attribute_value("units") {
            Some(Ok(AttributeValue::Str(s))) => s,
            Some(Ok(_)) | Some(Err(_)) => {
                return Err(DatasetError::InvalidTime {
                    reason: "time 'units' attribute is not a string".to_string(),
                });
            }
            None => {
                return Err(DatasetError::InvalidTime {
                    reason: "time variable has no 'units' attribute".to_string(),
                });
            }
        };

        let parts: Vec<&str> = units_str.splitn(3, ' ').collect();
        if parts.len() < 3 || parts[1] != "since" {
            return Err(DatasetError::InvalidTime {
                reason: format!("unexpected time units format: '{units_str}'"),
            });
        }

        let step_seconds = match parts[0] {
            "days" | "day" => 86_400.0,
            "hours" | "hour" => 3_600.0,
            "minutes" | "minute" => 60.0,
            "seconds" | "second" => 1.0,
            other => {
                return Err(DatasetError::InvalidTime {
                    reason: format!("unsupported time unit: '{other}'"),
                });
            }
        };

        let stamp = parts[2];
        if stamp.len() < 10 {
            return Err(DatasetError::InvalidTime {
                reason: format!("base timestamp too short: '{stamp}'"),
            });
        }
        let base_date = NaiveDate::parse_from_str(&stamp[..10], "%Y-%m-%d").map_err(|e| {
            DatasetError::InvalidTime {
                reason: format!("failed to parse base date '{}': {e}", &stamp[..10]),
            }
        })?;

        let clock = stamp[10..].trim();
        let base_time = if clock.is_empty() {
            NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is a valid time")
        } else {
            NaiveTime::parse_from_str(clock, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
                .map_err(|e| DatasetError::InvalidTime {
                    reason: format!("failed to parse base clock '{clock}': {e}"),
                })?
        };

        let calendar = match var.attribute_value("calendar") {
            Some(Ok(AttributeValue::Str(s))) => s.to_lowercase(),
            _ => "standard".to_string(),
        };

        Ok(TimeUnits {
            step_seconds,
            base: base_date.and_time(base_time),
            calendar,
        })
    }
}

/// Converts one raw offset into a timestamp under the axis's calendar.
///
/// Whole days advance on the file's calendar; the sub-day remainder
/// becomes the time of day. Julian-calendar labels are kept as written by
/// the model, which leaves 1900-02-29 unrepresentable.
fn decode_offset(units: &TimeUnits, offset: f64) -> Result<NaiveDateTime, DatasetError> {
    let total = offset * units.step_seconds + f64::from(units.base.time().num_seconds_from_midnight());
    let mut days = total.div_euclid(86_400.0) as i64;
    let mut rem = total.rem_euclid(86_400.0).round() as u32;
    if rem >= 86_400 {
        days += 1;
        rem = 0;
    }

    let base_day = units.base.date();
    let date = if units.calendar == "julian" {
        let (y, m, d) = julian_label_add(
            i64::from(base_day.year()),
            i64::from(base_day.month()),
            i64::from(base_day.day()),
            days,
        );
        NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32).ok_or_else(|| {
            DatasetError::InvalidTime {
                reason: format!("{y:04}-{m:02}-{d:02} exists only on the model's Julian calendar"),
            }
        })?
    } else {
        base_day
            .checked_add_signed(TimeDelta::days(days))
            .ok_or_else(|| DatasetError::InvalidTime {
                reason: format!("date overflow adding {days} days to {base_day}"),
            })?
    };

    let time = NaiveTime::from_num_seconds_from_midnight_opt(rem, 0)
        .expect("remainder is always below 86400 seconds");
    Ok(date.and_time(time))
}

/// Reads a string attribute, defaulting to empty when absent or not a
/// string.
fn string_attr(var: &netcdf::Variable<'_>, name: &str) -> String {
    var.attribute_value(name)
        .and_then(|res| res.ok())
        .and_then(|av| match av {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        })
        .unwrap_or_default()
}

/// A variable usable for point extraction has a leading time axis and at
/// least one further axis.
fn check_time_major(var_name: &str, dims: &[netcdf::Dimension<'_>]) -> Result<(), DatasetError> {
    if dims.len() < 2 {
        return Err(DatasetError::ShapeMismatch {
            name: format!("{var_name} dimensions"),
            expected: 2,
            got: dims.len(),
        });
    }
    if dims[0].name() != TIME_AXIS {
        return Err(DatasetError::InvalidArgument {
            reason: format!("variable '{var_name}' is not time-major"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(step_seconds: f64, base: &str, calendar: &str) -> TimeUnits {
        TimeUnits {
            step_seconds,
            base: NaiveDateTime::parse_from_str(base, "%Y-%m-%d %H:%M:%S").unwrap(),
            calendar: calendar.to_string(),
        }
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn decode_days_standard() {
        let u = units(86_400.0, "2000-01-01 00:00:00", "standard");
        assert_eq!(decode_offset(&u, 0.0).unwrap(), ts("2000-01-01 00:00:00"));
        assert_eq!(decode_offset(&u, 1.0).unwrap(), ts("2000-01-02 00:00:00"));
        assert_eq!(decode_offset(&u, 0.5).unwrap(), ts("2000-01-01 12:00:00"));
        assert_eq!(decode_offset(&u, 59.0).unwrap(), ts("2000-02-29 00:00:00"));
    }

    #[test]
    fn decode_hours_with_base_clock() {
        let u = units(3_600.0, "2010-01-01 03:00:00", "standard");
        assert_eq!(decode_offset(&u, 0.0).unwrap(), ts("2010-01-01 03:00:00"));
        assert_eq!(decode_offset(&u, 21.0).unwrap(), ts("2010-01-02 00:00:00"));
        assert_eq!(decode_offset(&u, 24.0).unwrap(), ts("2010-01-02 03:00:00"));
    }

    #[test]
    fn decode_julian_keeps_model_labels() {
        let u = units(86_400.0, "1899-12-30 00:00:00", "julian");
        // Offset 61 is the Julian 1900-02-29; 63 lands on 1900-03-02.
        assert_eq!(decode_offset(&u, 60.0).unwrap(), ts("1900-02-28 00:00:00"));
        assert_eq!(decode_offset(&u, 63.0).unwrap(), ts("1900-03-02 00:00:00"));
    }

    #[test]
    fn decode_julian_leap_day_is_unrepresentable() {
        let u = units(86_400.0, "1899-12-30 00:00:00", "julian");
        let err = decode_offset(&u, 61.0).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidTime { .. }));
        assert!(err.to_string().contains("1900-02-29"));
    }

    #[test]
    fn decode_negative_offset() {
        let u = units(86_400.0, "2000-01-10 00:00:00", "standard");
        assert_eq!(decode_offset(&u, -9.0).unwrap(), ts("2000-01-01 00:00:00"));
    }

    #[test]
    fn decode_midday_offsets() {
        // Daily model output stamps timesteps at half-day offsets.
        let u = units(86_400.0, "1925-01-01 00:00:00", "julian");
        assert_eq!(decode_offset(&u, 0.5).unwrap(), ts("1925-01-01 12:00:00"));
        assert_eq!(decode_offset(&u, 1.5).unwrap(), ts("1925-01-02 12:00:00"));
    }
}
