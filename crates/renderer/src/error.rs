//! Error types for figure rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("PNG compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Nothing to plot for '{0}'")]
    EmptySeries(String),

    #[error("Grid for '{0}' has no coordinates")]
    EmptyGrid(String),

    #[error("Unknown color scale '{0}'")]
    UnknownColorScale(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),
}
