//! Accessor configuration: dataset base paths and the monitoring-site
//! registry.
//!
//! Paths are supplied explicitly by the caller and validated by each
//! accessor at construction, so a partially-configured environment (say,
//! only the forcing root) never blocks unrelated functionality.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DatasetError;

/// Base directories for the three dataset families.
///
/// All three are optional; each accessor requires only its own root and
/// fails with [`DatasetError::Configuration`] when that root is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataRoots {
    /// Root of the model output tree.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Root of the forcing file tree.
    #[serde(default)]
    pub forcing: Option<PathBuf>,

    /// Root of the monitoring-network observation tree.
    #[serde(default)]
    pub observations: Option<PathBuf>,
}

impl DataRoots {
    /// Creates an empty configuration with no roots set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model output root.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Set the forcing root.
    pub fn with_forcing(mut self, path: impl Into<PathBuf>) -> Self {
        self.forcing = Some(path.into());
        self
    }

    /// Set the observation root.
    pub fn with_observations(mut self, path: impl Into<PathBuf>) -> Self {
        self.observations = Some(path.into());
        self
    }

    pub(crate) fn require_output(&self) -> Result<&Path, DatasetError> {
        self.output
            .as_deref()
            .ok_or_else(|| DatasetError::Configuration {
                reason: "model output root is not set".to_string(),
            })
    }

    pub(crate) fn require_forcing(&self) -> Result<&Path, DatasetError> {
        self.forcing
            .as_deref()
            .ok_or_else(|| DatasetError::Configuration {
                reason: "forcing root is not set".to_string(),
            })
    }

    pub(crate) fn require_observations(&self) -> Result<&Path, DatasetError> {
        self.observations
            .as_deref()
            .ok_or_else(|| DatasetError::Configuration {
                reason: "observation root is not set".to_string(),
            })
    }
}

/// Per-site observation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteInfo {
    /// File-name abbreviation used by the monitoring network
    /// (e.g. `TG` for Tony Grove).
    pub abbreviation: String,

    /// Offset from local sensor time to UTC, in hours.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i64,
}

fn default_utc_offset() -> i64 {
    7
}

/// Registry of monitoring sites known to the observation accessor.
///
/// The [`Default`] registry carries the sites currently instrumented;
/// additional sites are registered with [`with_site`](Self::with_site).
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SiteRegistry {
    sites: BTreeMap<String, SiteInfo>,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        let mut sites = BTreeMap::new();
        sites.insert(
            "Tony Grove".to_string(),
            SiteInfo {
                abbreviation: "TG".to_string(),
                utc_offset_hours: default_utc_offset(),
            },
        );
        Self { sites }
    }
}

impl SiteRegistry {
    /// Creates an empty registry with no sites.
    pub fn empty() -> Self {
        Self {
            sites: BTreeMap::new(),
        }
    }

    /// Register a site, replacing any existing entry with the same name.
    pub fn with_site(
        mut self,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        utc_offset_hours: i64,
    ) -> Self {
        self.sites.insert(
            name.into(),
            SiteInfo {
                abbreviation: abbreviation.into(),
                utc_offset_hours,
            },
        );
        self
    }

    /// Look up a site by its monitoring-network name.
    pub fn get(&self, site: &str) -> Option<&SiteInfo> {
        self.sites.get(site)
    }
}
