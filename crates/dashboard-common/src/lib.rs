//! Common types shared across the climate dashboard figure workspace.

pub mod bbox;
pub mod dataset;
pub mod error;
pub mod time;

pub use bbox::BoundingBox;
pub use dataset::{Coordinates, DataVariable, GriddedDataset, VariableGrid};
pub use error::{DatasetError, DatasetResult};
pub use time::{ForecastSpan, TimeWindow};
