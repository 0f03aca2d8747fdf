//! Error types for dataset construction and slicing.

use thiserror::Error;

/// Result type alias using DatasetError.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while assembling, cleaning or slicing a gridded dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Variable '{name}' has {actual} values, expected {expected} for its coordinates")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Coordinate mismatch while merging '{0}'")]
    CoordinateMismatch(String),

    #[error("Variable '{0}' appears more than once")]
    DuplicateVariable(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Nothing left after cropping: {0}")]
    EmptyDomain(String),

    #[error("Dataset has no timestamps")]
    EmptyTimeAxis,

    #[error("No grids to merge")]
    NoVariables,

    #[error("Invalid time window: end {end} is not after start {start}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}
