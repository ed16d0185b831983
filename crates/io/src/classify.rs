//! Shape classification of requested variables.
//!
//! Each requested name is matched against the catalog and routed to the
//! reshaping strategy its dimension signature calls for. Individual
//! problems never abort a request; they accumulate as rejections and are
//! logged, and the caller decides what to do when nothing usable remains.

use std::fmt;

use tracing::warn;

use crate::catalog::VariableDescriptor;

/// The reshaping strategies recognized for model variables.
///
/// Adding a strategy means adding a variant here and handling it wherever
/// the compiler points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeClass {
    /// Flat per-timestep scalar (time plus spatial axes only).
    TimeSeries,
    /// Per-timestep vector over a soil depth axis.
    DepthProfile {
        /// Name of the depth axis to pivot over.
        depth_axis: String,
    },
    /// Per-timestep vector over a spectral band axis. Recognized but not
    /// materialized.
    MultiBand,
}

/// Why a requested variable was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The name is absent from the dataset's catalog.
    NotFound,
    /// The dimension signature matches no known shape class.
    UnsupportedShape,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotFound => write!(f, "not found"),
            RejectReason::UnsupportedShape => write!(f, "unsupported shape"),
        }
    }
}

/// Disjoint partition of a requested variable list.
///
/// Every requested name lands in exactly one group. Computed fresh per
/// request; never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Flat per-timestep variables.
    pub time_series: Vec<String>,
    /// Depth-profile variables, each with its depth axis.
    pub depth_profile: Vec<(String, String)>,
    /// Multi-band variables (recognized, never materialized).
    pub multi_band: Vec<String>,
    /// Rejected names with the reason for each.
    pub rejected: Vec<(String, RejectReason)>,
}

impl Classification {
    /// Returns `true` when at least one group can produce columns.
    pub fn has_materializable(&self) -> bool {
        !self.time_series.is_empty() || !self.depth_profile.is_empty()
    }
}

/// Determines the shape class of a single variable, or `None` when the
/// signature matches nothing recognized.
pub fn shape_class(desc: &VariableDescriptor) -> Option<ShapeClass> {
    if !desc.has_time_axis() {
        return None;
    }
    if let Some(axis) = desc.depth_axis() {
        return Some(ShapeClass::DepthProfile {
            depth_axis: axis.to_string(),
        });
    }
    if desc.has_band_axis() {
        return Some(ShapeClass::MultiBand);
    }
    if desc.has_spatial_axis() && desc.is_flat() {
        return Some(ShapeClass::TimeSeries);
    }
    None
}

/// Partitions `requested` against `catalog`.
///
/// Unknown names and unrecognized shapes are rejected with a warning;
/// classification itself never fails.
pub fn classify(requested: &[&str], catalog: &[VariableDescriptor]) -> Classification {
    let mut result = Classification::default();

    for &name in requested {
        let Some(desc) = catalog.iter().find(|d| d.name == name) else {
            warn!(variable = name, "requested variable not found in catalog");
            result.rejected.push((name.to_string(), RejectReason::NotFound));
            continue;
        };

        match shape_class(desc) {
            Some(ShapeClass::TimeSeries) => result.time_series.push(name.to_string()),
            Some(ShapeClass::DepthProfile { depth_axis }) => {
                result.depth_profile.push((name.to_string(), depth_axis));
            }
            Some(ShapeClass::MultiBand) => result.multi_band.push(name.to_string()),
            None => {
                warn!(
                    variable = name,
                    dimensions = ?desc.dimensions,
                    "requested variable has an unsupported shape"
                );
                result
                    .rejected
                    .push((name.to_string(), RejectReason::UnsupportedShape));
            }
        }
    }

    result
}
