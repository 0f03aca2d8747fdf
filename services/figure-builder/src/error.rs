//! Error type for a figure-building run.

use netcdf_parser::NetCdfError;
use dashboard_common::DatasetError;
use grid_stats::StatsError;
use renderer::RenderError;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    NetCdf(#[from] NetCdfError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Output directory {} does not exist", .0.display())]
    MissingOutputDir(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
