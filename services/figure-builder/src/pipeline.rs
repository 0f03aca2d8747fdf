//! Figure generation run: load, aggregate, render, write.
//!
//! Variables are processed one after another in configuration order. Each
//! produces `chart_{name}.html` and `map_{name}.html` in the output
//! directory; existing files are overwritten. The first failure aborts the
//! run and documents already written are left in place.

use dashboard_common::{GriddedDataset, TimeWindow};
use grid_stats::{space_series, time_median_grid};
use renderer::{render_chart_html, render_map_html, ChartSpec};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{FigureConfig, VariableConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::loader::load_dataset;

/// The two documents made for each variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureKind {
    Chart,
    Map,
}

impl FigureKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            FigureKind::Chart => "chart",
            FigureKind::Map => "map",
        }
    }

    /// `{kind}_{variable}.html`
    pub fn file_name(&self, variable: &str) -> String {
        format!("{}_{}.html", self.prefix(), variable)
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A document written by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub variable: String,
    pub kind: FigureKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub window: TimeWindow,
    pub artifacts: Vec<Artifact>,
}

/// Rendered but not yet written documents for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFigures {
    pub chart_html: String,
    pub map_html: String,
}

/// Run the whole pipeline from the configured input files.
pub fn run(config: &FigureConfig) -> PipelineResult<RunSummary> {
    config.validate()?;
    ensure_output_dir(&config.output_dir)?;
    let dataset = load_dataset(config)?;
    run_with_dataset(config, &dataset)
}

/// Render and write every configured variable of an already loaded dataset.
pub fn run_with_dataset(config: &FigureConfig, dataset: &GriddedDataset) -> PipelineResult<RunSummary> {
    config.validate()?;
    ensure_output_dir(&config.output_dir)?;

    let window = TimeWindow::from_first_timestamp(&dataset.coords().times, config.span)?;
    info!(
        span = %config.span,
        start = %window.start,
        end = %window.end,
        "Selected forecast window"
    );

    let mut artifacts = Vec::with_capacity(config.variables.len() * 2);
    for variable in &config.variables {
        info!(variable = %variable.name, "Rendering figures");
        let figures = render_variable(config, dataset, &window, variable)?;

        let path = write_document(&config.output_dir, FigureKind::Chart, &variable.name, &figures.chart_html)?;
        info!(variable = %variable.name, path = %path.display(), "chart saved to file");
        artifacts.push(Artifact {
            variable: variable.name.clone(),
            kind: FigureKind::Chart,
            path,
        });

        let path = write_document(&config.output_dir, FigureKind::Map, &variable.name, &figures.map_html)?;
        info!(variable = %variable.name, path = %path.display(), "map saved to file");
        artifacts.push(Artifact {
            variable: variable.name.clone(),
            kind: FigureKind::Map,
            path,
        });
    }

    Ok(RunSummary { window, artifacts })
}

/// Build both documents for `variable` without touching the filesystem.
///
/// The chart is driven by this variable's own spatial series and the map by
/// its own time-median grid.
pub fn render_variable(
    config: &FigureConfig,
    dataset: &GriddedDataset,
    window: &TimeWindow,
    variable: &VariableConfig,
) -> PipelineResult<RenderedFigures> {
    let series = space_series(dataset, &variable.name, window)?;
    let spec = ChartSpec::for_variable(
        &variable.name,
        &variable.display_name,
        config.span,
        variable.chart_color(),
    )
    .with_size(config.chart.width, config.chart.height);
    let chart_html = render_chart_html(&spec, &series)?;

    let grid = time_median_grid(dataset, &variable.name, window)?;
    let map_html = render_map_html(&config.map, &grid, variable.color_scale, &variable.display_name)?;

    debug!(
        variable = %variable.name,
        timestamps = series.len(),
        chart_bytes = chart_html.len(),
        map_bytes = map_html.len(),
        "Rendered figures"
    );

    Ok(RenderedFigures { chart_html, map_html })
}

fn ensure_output_dir(dir: &Path) -> PipelineResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(PipelineError::MissingOutputDir(dir.to_path_buf()))
    }
}

fn write_document(dir: &Path, kind: FigureKind, variable: &str, html: &str) -> PipelineResult<PathBuf> {
    let path = dir.join(kind.file_name(variable));
    fs::write(&path, html).map_err(|source| PipelineError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(FigureKind::Chart.file_name("prate"), "chart_prate.html");
        assert_eq!(FigureKind::Map.file_name("watr"), "map_watr.html");
    }

    #[test]
    fn test_missing_output_dir() {
        let err = ensure_output_dir(Path::new("/nonexistent/figures")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingOutputDir(_)));
        assert!(err.to_string().contains("/nonexistent/figures"));
    }
}
