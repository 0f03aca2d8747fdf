//! Error types for window aggregation.

use dashboard_common::DatasetError;
use thiserror::Error;

/// Result type alias using StatsError.
pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("No timestamps fall inside the window {start} .. {end}")]
    EmptyWindow { start: String, end: String },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
