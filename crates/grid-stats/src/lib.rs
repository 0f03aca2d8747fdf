//! Time-window aggregation of gridded forecast data.
//!
//! Two reductions feed the dashboard figures:
//! - [`time_median_grid`] collapses the time axis, giving one median per cell
//!   for the map.
//! - [`space_series`] collapses the spatial axes, giving a median and standard
//!   deviation per timestamp for the chart.
//!
//! All reductions skip NaN samples, so masked cells never contribute.

pub mod aggregate;
pub mod error;
pub mod reduce;

pub use aggregate::{space_series, time_median_grid, window_indices, AggregateSeries, SpatialGrid};
pub use error::{StatsError, StatsResult};
pub use reduce::{nan_mean, nan_median, nan_min_max, nan_std};
