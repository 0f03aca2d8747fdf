//! Climate dashboard figure builder.
//!
//! Turns four CFS forecast files into one chart and one map document per
//! variable, ready to be embedded by the dashboard.

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;

pub use config::{ChartSettings, ConfigError, ConfigOverrides, CoordinateNames, FigureConfig, VariableConfig};
pub use error::{PipelineError, PipelineResult};
pub use loader::load_dataset;
pub use pipeline::{render_variable, run, run_with_dataset, Artifact, FigureKind, RenderedFigures, RunSummary};
