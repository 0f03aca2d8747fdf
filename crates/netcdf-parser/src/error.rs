//! Error types for NetCDF parsing operations.

use dashboard_common::DatasetError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format or layout
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Time coordinate units that are not "<unit> since <epoch>"
    #[error("Unsupported time units: {0}")]
    InvalidTimeUnits(String),

    /// Values read but inconsistent with their coordinates
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
