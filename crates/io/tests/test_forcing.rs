//! Integration tests for the forcing accessor against programmatic
//! NetCDF fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Timelike};
use tellus_io::{DataRoots, DatasetError, ForcingAccessor};
use tempfile::tempdir;

const SITE: &str = "Tony Grove RS";
const FORCING_ID: &str = "00000000";
const VERSION: &str = "0.1";

/// Writes a 3-hourly forcing file with `n_days` of air temperature (plus
/// QC flags) and precipitation (no flags).
fn write_forcing(forcing_root: &Path, n_days: usize) -> PathBuf {
    let site_dir = forcing_root.join("tonygrovers");
    fs::create_dir_all(&site_dir).unwrap();

    let path = site_dir.join(format!("tonygrovers_spinup_s{FORCING_ID}_v{VERSION}.nc"));
    let mut file = netcdf::create(&path).expect("failed to create NetCDF file");

    let per_day = 8;
    let nt = n_days * per_day;

    file.add_dimension("time", nt).expect("add dim time");
    file.add_dimension("latitude", 1).expect("add dim latitude");
    file.add_dimension("longitude", 1).expect("add dim longitude");

    {
        let offsets: Vec<f64> = (0..nt).map(|i| (i * 3) as f64).collect();
        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .expect("add var time");
        var.put_values(&offsets, ..).expect("put time values");
        var.put_attribute("units", "hours since 2000-01-01")
            .expect("add time units");
    }

    {
        // Tair[t] = 260 + day index, so each daily mean equals 260 + day.
        let data: Vec<f64> = (0..nt).map(|i| 260.0 + (i / per_day) as f64).collect();
        let mut var = file
            .add_variable::<f64>("Tair", &["time", "latitude", "longitude"])
            .expect("add var Tair");
        var.put_values(&data, ..).expect("put Tair values");
        var.put_attribute("long_name", "air temperature")
            .expect("add long_name");
        var.put_attribute("units", "K").expect("add units");
    }

    {
        let data: Vec<f64> = (0..nt).map(|i| (i % 2) as f64).collect();
        let mut var = file
            .add_variable::<f64>("Tair_flag", &["time", "latitude", "longitude"])
            .expect("add var Tair_flag");
        var.put_values(&data, ..).expect("put Tair_flag values");
    }

    {
        let data = vec![0.0; nt];
        let mut var = file
            .add_variable::<f64>("Rainf", &["time", "latitude", "longitude"])
            .expect("add var Rainf");
        var.put_values(&data, ..).expect("put Rainf values");
    }

    path
}

fn accessor_for(forcing_root: &Path) -> ForcingAccessor {
    let roots = DataRoots::new().with_forcing(forcing_root);
    ForcingAccessor::open(&roots, SITE, FORCING_ID, VERSION, true).unwrap()
}

#[test]
fn open_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let roots = DataRoots::new().with_forcing(dir.path());

    let err = ForcingAccessor::open(&roots, SITE, FORCING_ID, VERSION, true).unwrap_err();
    assert!(matches!(err, DatasetError::NotFound { .. }));
}

#[test]
fn open_requires_forcing_root() {
    let err = ForcingAccessor::open(&DataRoots::new(), SITE, FORCING_ID, VERSION, true).unwrap_err();
    assert!(matches!(err, DatasetError::Configuration { .. }));
}

#[test]
fn list_variables_excludes_coordinates() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let accessor = accessor_for(dir.path());
    let names: Vec<String> = accessor
        .list_variables()
        .into_iter()
        .map(|d| d.name)
        .collect();

    assert!(names.contains(&"Tair".to_string()));
    assert!(names.contains(&"Rainf".to_string()));
    assert!(!names.contains(&"time".to_string()));
}

#[test]
fn get_data_uses_native_time_axis() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let series = accessor_for(dir.path()).get_data("Tair").unwrap();
    assert_eq!(series.len(), 32);
    assert_eq!(series.name(), "Tair");

    // Index is the raw 3-hourly axis, no noon normalization.
    let first = series.index()[0];
    assert_eq!(first.date(), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    assert_eq!(first.time().hour(), 0);
    assert_eq!(series.index()[1].time().hour(), 3);

    assert_eq!(series.values()[0], 260.0);
    assert_eq!(series.values()[31], 263.0);
}

#[test]
fn get_data_missing_variable_is_not_found() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let err = accessor_for(dir.path()).get_data("Wind").unwrap_err();
    assert!(matches!(err, DatasetError::NotFound { .. }));
}

#[test]
fn get_flags_returns_companion_series() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let flags = accessor_for(dir.path()).get_flags("Tair").unwrap();
    assert_eq!(flags.name(), "Tair_flag");
    assert_eq!(flags.len(), 32);
    assert_eq!(flags.values()[0], 0.0);
    assert_eq!(flags.values()[1], 1.0);
}

#[test]
fn get_flags_absent_is_empty_not_an_error() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let flags = accessor_for(dir.path()).get_flags("Rainf").unwrap();
    assert!(flags.is_empty());
    assert_eq!(flags.name(), "Rainf_flag");
}

#[test]
fn looped_series_tiles_daily_means() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let looped = accessor_for(dir.path())
        .get_looped_series("Tair", 20)
        .unwrap();

    // (20 / 10) cycles of (4 - 1) days each.
    assert_eq!(looped.len(), 6);
    assert_eq!(looped.values(), &[260.0, 261.0, 262.0, 260.0, 261.0, 262.0]);

    // Reindexed to a contiguous daily noon sequence starting 20 years
    // before the source's last year.
    let first = looped.index()[0];
    assert_eq!(first.date(), NaiveDate::from_ymd_opt(1980, 1, 1).unwrap());
    for (i, entry) in looped.index().iter().enumerate() {
        assert_eq!(entry.time().hour(), 12);
        assert_eq!(entry.date().ordinal(), 1 + i as u32);
    }
}

#[test]
fn looped_series_is_idempotent() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let accessor = accessor_for(dir.path());
    let first = accessor.get_looped_series("Tair", 20).unwrap();
    let second = accessor.get_looped_series("Tair", 20).unwrap();
    assert_eq!(first, second);
}

#[test]
fn looped_series_rejects_non_decade_spans() {
    let dir = tempdir().unwrap();
    write_forcing(dir.path(), 4);

    let accessor = accessor_for(dir.path());
    for years in [15, 7, 0] {
        let err = accessor.get_looped_series("Tair", years).unwrap_err();
        assert!(
            matches!(err, DatasetError::InvalidArgument { .. }),
            "expected InvalidArgument for {years} years"
        );
    }
}
