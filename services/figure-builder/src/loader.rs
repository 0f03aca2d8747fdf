//! Reads the configured forecast files into one cropped dataset.

use dashboard_common::GriddedDataset;
use netcdf_parser::read_variable_grid;
use tracing::{debug, info};

use crate::config::FigureConfig;
use crate::error::PipelineResult;

/// Read every configured variable, merge, mask missing values and crop.
pub fn load_dataset(config: &FigureConfig) -> PipelineResult<GriddedDataset> {
    let mut grids = Vec::with_capacity(config.variables.len());
    for variable in &config.variables {
        let path = config.input_path(variable);
        debug!(variable = %variable.name, path = %path.display(), "Reading grid");
        grids.push(read_variable_grid(&path, &config.read_options(variable))?);
    }

    let merged = GriddedDataset::merge(grids)?;
    let (nt, nlat, nlon) = merged.coords().shape();
    info!(
        variables = ?merged.variable_names(),
        times = nt,
        latitudes = nlat,
        longitudes = nlon,
        "Merged input grids"
    );

    let cropped = merged.mask_missing().crop(&config.bbox)?;
    let (_, nlat, nlon) = cropped.coords().shape();
    info!(latitudes = nlat, longitudes = nlon, bbox = ?config.bbox, "Cropped dataset");

    Ok(cropped)
}
