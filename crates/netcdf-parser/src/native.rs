//! Native NetCDF parsing using the netcdf library.

use std::path::Path;
use std::sync::Once;

use dashboard_common::{Coordinates, VariableGrid};
use netcdf::AttributeValue;
use tracing::debug;

use crate::cf_time::CfTimeUnits;
use crate::error::{NetCdfError, NetCdfResult};

/// Attribute names that may hold a variable's no-data sentinel, in priority order.
pub const DEFAULT_MISSING_VALUE_ATTRS: &[&str] = &["GRIB_missingValue", "missing_value", "_FillValue"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics even when the Rust side handles the
/// error (for example when probing for an optional attribute). Call this once
/// before any NetCDF access; repeated calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Names of the variables to read from one forecast file.
#[derive(Debug, Clone)]
pub struct GridReadOptions {
    /// Data variable (e.g. `prate`)
    pub variable: String,
    /// Time coordinate variable; falls back to the data variable's leading dimension
    pub time_coord: String,
    pub lat_coord: String,
    pub lon_coord: String,
    /// Attributes searched for the missing-value marker
    pub missing_value_attrs: Vec<String>,
}

impl GridReadOptions {
    /// Options for a cfgrib-style file holding `variable`.
    pub fn for_variable(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            time_coord: "valid_time".to_string(),
            lat_coord: "latitude".to_string(),
            lon_coord: "longitude".to_string(),
            missing_value_attrs: DEFAULT_MISSING_VALUE_ATTRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Read one data variable and its coordinates from a NetCDF file.
///
/// The variable's two trailing dimensions must be latitude and longitude; all
/// leading dimensions together form the time axis.
pub fn read_variable_grid<P: AsRef<Path>>(
    path: P,
    options: &GridReadOptions,
) -> NetCdfResult<VariableGrid> {
    silence_hdf5_errors();

    let path = path.as_ref();
    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let file = netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let var = file
        .variable(&options.variable)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", options.variable)))?;

    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();
    if dims.len() < 2 {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} has {} dimensions, expected at least (latitude, longitude)",
            options.variable,
            dims.len()
        )));
    }

    let latitudes = read_axis(&file, &options.lat_coord)?;
    let longitudes = read_axis(&file, &options.lon_coord)?;

    let (lat_dim, lon_dim) = (&dims[dims.len() - 2], &dims[dims.len() - 1]);
    if lat_dim.1 != latitudes.len() || lon_dim.1 != longitudes.len() {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} trailing dimensions {}={} and {}={} do not match {} latitudes and {} longitudes",
            options.variable,
            lat_dim.0,
            lat_dim.1,
            lon_dim.0,
            lon_dim.1,
            latitudes.len(),
            longitudes.len()
        )));
    }

    let leading: usize = dims[..dims.len() - 2].iter().map(|(_, len)| len).product();
    let time_name = pick_time_coord(&file, options, dims.first().map(|(n, _)| n.as_str()))?;
    let times = read_times(&file, &time_name)?;
    if times.len() != leading {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} has {} time steps but {} holds {}",
            options.variable,
            leading,
            time_name,
            times.len()
        )));
    }

    let data: Vec<f32> = var.get_values::<f32, _>(..).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to read {}: {}", options.variable, e))
    })?;

    let missing_value = options
        .missing_value_attrs
        .iter()
        .find_map(|attr| get_f64_attr(&var, attr))
        .map(|v| v as f32);

    debug!(
        path = %path.display(),
        variable = %options.variable,
        times = times.len(),
        latitudes = latitudes.len(),
        longitudes = longitudes.len(),
        missing_value = ?missing_value,
        "Read variable grid"
    );

    let coords = Coordinates::new(times, latitudes, longitudes);
    Ok(VariableGrid::new(
        options.variable.clone(),
        missing_value,
        coords,
        data,
    )?)
}

/// Write a grid in the same layout [`read_variable_grid`] expects.
///
/// Times are stored as seconds since the Unix epoch on a dimension named after
/// `options.time_coord`; the missing-value marker goes into the first of
/// `options.missing_value_attrs`.
pub fn write_variable_grid<P: AsRef<Path>>(
    path: P,
    grid: &VariableGrid,
    options: &GridReadOptions,
) -> NetCdfResult<()> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let nc_err = |what: &str, e: netcdf::Error| {
        NetCdfError::InvalidFormat(format!("Failed to write {} to {}: {}", what, path.display(), e))
    };

    let mut file = netcdf::create(path).map_err(|e| nc_err("file", e))?;
    let (nt, nlat, nlon) = grid.coords.shape();

    file.add_dimension(&options.time_coord, nt)
        .map_err(|e| nc_err("time dimension", e))?;
    file.add_dimension(&options.lat_coord, nlat)
        .map_err(|e| nc_err("latitude dimension", e))?;
    file.add_dimension(&options.lon_coord, nlon)
        .map_err(|e| nc_err("longitude dimension", e))?;

    let units: CfTimeUnits = "seconds since 1970-01-01T00:00:00".parse()?;
    let raw_times: Vec<f64> = grid.coords.times.iter().map(|t| units.encode(t)).collect();
    {
        let mut var = file
            .add_variable::<f64>(&options.time_coord, &[options.time_coord.as_str()])
            .map_err(|e| nc_err("time variable", e))?;
        var.put_attribute("units", "seconds since 1970-01-01T00:00:00")
            .map_err(|e| nc_err("time units", e))?;
        var.put_values(&raw_times, ..)
            .map_err(|e| nc_err("time values", e))?;
    }
    {
        let mut var = file
            .add_variable::<f64>(&options.lat_coord, &[options.lat_coord.as_str()])
            .map_err(|e| nc_err("latitude variable", e))?;
        var.put_attribute("units", "degrees_north")
            .map_err(|e| nc_err("latitude units", e))?;
        var.put_values(&grid.coords.latitudes, ..)
            .map_err(|e| nc_err("latitude values", e))?;
    }
    {
        let mut var = file
            .add_variable::<f64>(&options.lon_coord, &[options.lon_coord.as_str()])
            .map_err(|e| nc_err("longitude variable", e))?;
        var.put_attribute("units", "degrees_east")
            .map_err(|e| nc_err("longitude units", e))?;
        var.put_values(&grid.coords.longitudes, ..)
            .map_err(|e| nc_err("longitude values", e))?;
    }
    {
        let dims = [
            options.time_coord.as_str(),
            options.lat_coord.as_str(),
            options.lon_coord.as_str(),
        ];
        let mut var = file
            .add_variable::<f32>(&grid.name, &dims)
            .map_err(|e| nc_err("data variable", e))?;
        if let (Some(marker), Some(attr)) = (grid.missing_value, options.missing_value_attrs.first()) {
            // f32 to match the variable, which `_FillValue` requires.
            var.put_attribute(attr, marker)
                .map_err(|e| nc_err("missing value", e))?;
        }
        var.put_values(&grid.data, ..)
            .map_err(|e| nc_err("data values", e))?;
    }

    debug!(path = %path.display(), variable = %grid.name, "Wrote variable grid");
    Ok(())
}

// =============================================================================
// Internal helpers
// =============================================================================

fn read_axis(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} coordinate", name)))?;
    if var.dimensions().len() != 1 {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} coordinate must be one-dimensional",
            name
        )));
    }
    var.get_values::<f64, _>(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))
}

/// Prefer the configured time coordinate, then one named after the leading dimension.
fn pick_time_coord(
    file: &netcdf::File,
    options: &GridReadOptions,
    leading_dim: Option<&str>,
) -> NetCdfResult<String> {
    if file.variable(&options.time_coord).is_some() {
        return Ok(options.time_coord.clone());
    }
    match leading_dim {
        Some(dim) if dim != options.lat_coord && file.variable(dim).is_some() => Ok(dim.to_string()),
        _ => Err(NetCdfError::MissingData(format!(
            "{} time coordinate",
            options.time_coord
        ))),
    }
}

fn read_times(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<chrono::DateTime<chrono::Utc>>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} coordinate", name)))?;
    let units = get_string_attr(&var, "units")
        .ok_or_else(|| NetCdfError::MissingData(format!("units attribute on {}", name)))?;
    let units: CfTimeUnits = units.parse()?;
    let raw: Vec<f64> = var
        .get_values::<f64, _>(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    units.decode_all(&raw)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = GridReadOptions::for_variable("prate");
        assert_eq!(opts.variable, "prate");
        assert_eq!(opts.time_coord, "valid_time");
        assert_eq!(opts.missing_value_attrs[0], "GRIB_missingValue");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let opts = GridReadOptions::for_variable("prate");
        let err = read_variable_grid("/nonexistent/cfs_prate.nc", &opts).unwrap_err();
        assert!(matches!(err, NetCdfError::IoError(_)));
    }
}
