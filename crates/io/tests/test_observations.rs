//! Integration tests for the observation accessor against on-disk CSV
//! fixtures.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use tellus_io::{DataRoots, DatasetError, ObservationAccessor, SiteRegistry};
use tempfile::tempdir;

const BP_FILE: &str = "LR_TG_C_BP_Avg_SourceID_1_QC_1.csv";
const SOIL_FILE: &str = "LR_TG_C_SoilTemp_Avg_SourceID_1_QC_1.csv";

/// Writes a Tony Grove site directory with two observation files, a
/// non-CSV stray, and a file from another site's export.
fn write_site_dir(obs_root: &Path) {
    let site_dir = obs_root.join("tonygrove");
    fs::create_dir_all(&site_dir).unwrap();

    let bp = "\
# Logan River observatory export\n\
# Series: barometric pressure\n\
LocalDateTime,UTCOffset,BP_Avg\n\
2014-10-01 00:00:00,-7,867.2\n\
2014-10-01 00:30:00,-7,867.5\n\
2014-10-01 01:00:00,-7,\n\
2014-10-01 01:30:00,-7,868.1\n";
    fs::write(site_dir.join(BP_FILE), bp).unwrap();

    let soil = "\
# Logan River observatory export\n\
LocalDateTime,SoilTemp_Avg\n\
2014-10-01 00:00:00,11.5\n\
2014-10-01 00:30:00,11.4\n";
    fs::write(site_dir.join(SOIL_FILE), soil).unwrap();

    fs::write(site_dir.join("readme.txt"), "not data").unwrap();
    fs::write(
        site_dir.join("LR_FB_C_BP_Avg_SourceID_1_QC_1.csv"),
        "LocalDateTime,BP_Avg\n",
    )
    .unwrap();
}

fn accessor_for(obs_root: &Path) -> ObservationAccessor {
    let roots = DataRoots::new().with_observations(obs_root);
    ObservationAccessor::new(&roots, &SiteRegistry::default(), "Tony Grove").unwrap()
}

#[test]
fn list_files_matches_site_prefix_only() {
    let dir = tempdir().unwrap();
    write_site_dir(dir.path());

    let files = accessor_for(dir.path()).list_files().unwrap();
    assert_eq!(files, vec![BP_FILE.to_string(), SOIL_FILE.to_string()]);
}

#[test]
fn list_files_missing_site_dir_is_not_found() {
    let dir = tempdir().unwrap();
    // No site directory created.
    let err = accessor_for(dir.path()).list_files().unwrap_err();
    assert!(matches!(err, DatasetError::NotFound { .. }));
}

#[test]
fn list_variables_strips_naming_convention() {
    let dir = tempdir().unwrap();
    write_site_dir(dir.path());

    let variables = accessor_for(dir.path()).list_variables().unwrap();
    assert_eq!(variables.len(), 2);
    assert!(variables.contains(&"BP_Avg".to_string()));
    assert!(variables.contains(&"SoilTemp_Avg".to_string()));
}

#[test]
fn get_data_shifts_timestamps_to_utc() {
    let dir = tempdir().unwrap();
    write_site_dir(dir.path());

    let series = accessor_for(dir.path()).get_data("BP_Avg").unwrap();

    // The blank-value row is skipped.
    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), &[867.2, 867.5, 868.1]);

    let local_first = NaiveDate::from_ymd_opt(2014, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(series.index()[0], local_first + TimeDelta::hours(7));

    // Every timestamp is exactly +7h from its local counterpart.
    let local = [
        local_first,
        local_first + TimeDelta::minutes(30),
        local_first + TimeDelta::minutes(90),
    ];
    for (shifted, local) in series.index().iter().zip(local) {
        assert_eq!(*shifted - local, TimeDelta::hours(7));
    }
}

#[test]
fn get_data_honours_per_site_offset() {
    let dir = tempdir().unwrap();
    write_site_dir(dir.path());

    let roots = DataRoots::new().with_observations(dir.path());
    let registry = SiteRegistry::empty().with_site("Tony Grove", "TG", 5);
    let accessor = ObservationAccessor::new(&roots, &registry, "Tony Grove").unwrap();

    let series = accessor.get_data("SoilTemp_Avg").unwrap();
    let local_first = NaiveDate::from_ymd_opt(2014, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(series.index()[0], local_first + TimeDelta::hours(5));
}

#[test]
fn get_data_missing_variable_is_not_found() {
    let dir = tempdir().unwrap();
    write_site_dir(dir.path());

    let err = accessor_for(dir.path()).get_data("WaterTemp_EXO").unwrap_err();
    match err {
        DatasetError::NotFound { what, .. } => assert!(what.contains("WaterTemp_EXO")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn get_data_without_header_row_is_a_csv_error() {
    let dir = tempdir().unwrap();
    let site_dir = dir.path().join("tonygrove");
    fs::create_dir_all(&site_dir).unwrap();
    fs::write(site_dir.join(BP_FILE), "no header here\n1,2,3\n").unwrap();

    let err = accessor_for(dir.path()).get_data("BP_Avg").unwrap_err();
    assert!(matches!(err, DatasetError::Csv { .. }));
    assert!(err.to_string().contains("LocalDateTime"));
}

#[test]
fn get_data_is_deterministic() {
    let dir = tempdir().unwrap();
    write_site_dir(dir.path());

    let accessor = accessor_for(dir.path());
    let first = accessor.get_data("BP_Avg").unwrap();
    let second = accessor.get_data("BP_Avg").unwrap();
    assert_eq!(first, second);
}
