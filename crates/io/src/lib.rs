//! # tellus-io
//!
//! Typed accessors over the on-disk datasets of single-site land-surface
//! model runs: diagnostic output histories (NetCDF), atmospheric forcing
//! input (NetCDF), and monitoring-network sensor observations (delimited
//! text). Each accessor resolves its files from configured base paths,
//! exposes a variable catalog, and extracts tabular time series with a
//! correctly-dated index.
//!
//! ## Accessors
//!
//! | Accessor | Backing data |
//! |----------|--------------|
//! | [`ModelOutputAccessor`] | Per-diagnostic NetCDF histories under `<output>/<site>/<run>/history` |
//! | [`ForcingAccessor`] | One NetCDF forcing file per run |
//! | [`ObservationAccessor`] | Per-variable sensor CSV files per site |
//!
//! ## Threading
//!
//! Accessors own their open dataset handles exclusively and keep a
//! private, unsynchronized handle cache. They are single-threaded by
//! design: do not share an accessor across threads without external
//! synchronization.

mod catalog;
mod classify;
mod config;
mod error;
mod forcing;
mod handle;
mod observations;
mod output;
mod paths;
mod table;

pub use catalog::VariableDescriptor;
pub use classify::{Classification, RejectReason, ShapeClass, classify, shape_class};
pub use config::{DataRoots, SiteInfo, SiteRegistry};
pub use error::DatasetError;
pub use forcing::ForcingAccessor;
pub use handle::DatasetHandle;
pub use observations::ObservationAccessor;
pub use output::ModelOutputAccessor;
pub use paths::ModelRun;
pub use table::{DataSeries, DataTable};
