//! Deterministic path construction for model run datasets.

use std::path::{Path, PathBuf};

/// Identity of one model run: site, forcing variant, output version, and
/// whether it is a spin-up run.
///
/// The site name is normalized once at construction (spaces stripped,
/// lowercased) so that monitoring-network names like `"Tony Grove RS"`
/// and model names like `"tonygrovers"` resolve to the same directories.
/// Path construction is pure; no filesystem access happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRun {
    site: String,
    forcing_id: String,
    version: String,
    spinup: bool,
}

impl ModelRun {
    /// Creates a run identity.
    ///
    /// `forcing_id` is the forcing bit-string (e.g. `"00000000"`),
    /// `version` the output version (e.g. `"1.0"`).
    pub fn new(site: &str, forcing_id: &str, version: &str, spinup: bool) -> Self {
        Self {
            site: normalize_site(site),
            forcing_id: forcing_id.to_string(),
            version: version.to_string(),
            spinup,
        }
    }

    /// Normalized site segment.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Returns `true` for spin-up runs.
    pub fn is_spinup(&self) -> bool {
        self.spinup
    }

    /// Directory/file stem of this run:
    /// `<site>_[spinup_]s<forcing_id>_v<version>`.
    pub fn dir_name(&self) -> String {
        if self.spinup {
            format!(
                "{}_spinup_s{}_v{}",
                self.site, self.forcing_id, self.version
            )
        } else {
            format!("{}_s{}_v{}", self.site, self.forcing_id, self.version)
        }
    }

    /// Directory holding the run's diagnostic history files.
    pub fn history_dir(&self, output_root: &Path) -> PathBuf {
        output_root
            .join(&self.site)
            .join(self.dir_name())
            .join("history")
    }

    /// Path of the run's single forcing file.
    pub fn forcing_file(&self, forcing_root: &Path) -> PathBuf {
        forcing_root
            .join(&self.site)
            .join(format!("{}.nc", self.dir_name()))
    }
}

/// Collapses a site name into its directory segment: spaces removed,
/// lowercased.
pub(crate) fn normalize_site(site: &str) -> String {
    site.replace(' ', "").to_lowercase()
}
