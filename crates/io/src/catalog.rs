//! Variable descriptors and the axis names recognized in model files.

/// Name of the time axis in every model file.
pub(crate) const TIME_AXIS: &str = "time";

/// Spatial axes of single-site runs. Model output collapses the grid to
/// one `grid_index` column; forcing files keep degenerate latitude and
/// longitude axes of length one.
pub(crate) const SPATIAL_AXES: &[&str] = &["grid_index", "latitude", "longitude", "lat", "lon"];

/// Soil depth axes (full- and half-level).
pub(crate) const DEPTH_AXES: &[&str] = &["zfull_soil", "zhalf_soil"];

/// Spectral band axes used by the radiation diagnostics.
pub(crate) const BAND_AXES: &[&str] = &["band"];

/// Read-only description of one variable in an open dataset: its name,
/// ordered dimension signature, and the free-text metadata attached by
/// the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDescriptor {
    /// Variable name.
    pub name: String,
    /// Ordered dimension names.
    pub dimensions: Vec<String>,
    /// `long_name` attribute, or empty when absent.
    pub long_name: String,
    /// `units` attribute, or empty when absent.
    pub units: String,
}

impl VariableDescriptor {
    pub(crate) fn has_time_axis(&self) -> bool {
        self.dimensions.iter().any(|d| d == TIME_AXIS)
    }

    pub(crate) fn depth_axis(&self) -> Option<&str> {
        self.dimensions
            .iter()
            .map(String::as_str)
            .find(|d| DEPTH_AXES.contains(d))
    }

    pub(crate) fn has_band_axis(&self) -> bool {
        self.dimensions
            .iter()
            .any(|d| BAND_AXES.contains(&d.as_str()))
    }

    pub(crate) fn has_spatial_axis(&self) -> bool {
        self.dimensions
            .iter()
            .any(|d| SPATIAL_AXES.contains(&d.as_str()))
    }

    /// True when every dimension is either the time axis or a spatial
    /// axis, i.e. the variable is a flat per-timestep scalar.
    pub(crate) fn is_flat(&self) -> bool {
        self.dimensions
            .iter()
            .all(|d| d == TIME_AXIS || SPATIAL_AXES.contains(&d.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &str, dims: &[&str]) -> VariableDescriptor {
        VariableDescriptor {
            name: name.to_string(),
            dimensions: dims.iter().map(|d| d.to_string()).collect(),
            long_name: String::new(),
            units: String::new(),
        }
    }

    #[test]
    fn flat_output_variable() {
        let v = desc("snow_depth", &["time", "grid_index"]);
        assert!(v.has_time_axis());
        assert!(v.has_spatial_axis());
        assert!(v.is_flat());
        assert!(v.depth_axis().is_none());
        assert!(!v.has_band_axis());
    }

    #[test]
    fn flat_forcing_variable() {
        let v = desc("Tair", &["time", "latitude", "longitude"]);
        assert!(v.is_flat());
        assert!(v.has_spatial_axis());
    }

    #[test]
    fn soil_profile_variable() {
        let v = desc("soil_T", &["time", "zfull_soil", "grid_index"]);
        assert_eq!(v.depth_axis(), Some("zfull_soil"));
        assert!(!v.is_flat());
    }

    #[test]
    fn radiation_band_variable() {
        let v = desc("swdn_dir", &["time", "band", "grid_index"]);
        assert!(v.has_band_axis());
        assert!(!v.is_flat());
    }

    #[test]
    fn bounds_variable_is_not_flat() {
        let v = desc("time_bnds", &["time", "bnds"]);
        assert!(v.has_time_axis());
        assert!(!v.has_spatial_axis());
        assert!(!v.is_flat());
    }
}
