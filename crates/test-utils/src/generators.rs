//! Test data generators for creating synthetic forecast data.
//!
//! These generators create predictable, verifiable patterns so tests can
//! compute expected medians and standard deviations by hand.

use chrono::{DateTime, Duration, Utc};
use dashboard_common::{Coordinates, GriddedDataset, VariableGrid};

use crate::fixtures::{grid, time, variables};

/// Per-variable offsets used by [`cfs_value`], in [`variables::NAMES`] order.
pub const VARIABLE_OFFSETS: [f32; 4] = [0.0, 10.0, 270.0, 100.0];

/// First forecast timestamp of the synthetic files.
pub fn cfs_start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(time::REFERENCE_TIME)
        .expect("valid reference time")
        .with_timezone(&Utc)
}

/// `count` timestamps spaced [`time::STEP_HOURS`] apart from [`cfs_start`].
pub fn create_time_axis(count: usize) -> Vec<DateTime<Utc>> {
    (0..count)
        .map(|i| cfs_start() + Duration::hours(time::STEP_HOURS * i as i64))
        .collect()
}

/// Evenly spaced axis values.
pub fn create_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Coordinates of the synthetic grid: lat 55..30 descending, lon 225..255.
pub fn create_pnw_coords(time_steps: usize) -> Coordinates {
    Coordinates::new(
        create_time_axis(time_steps),
        create_axis(grid::LAT_START, grid::LAT_STEP, grid::LAT_COUNT),
        create_axis(grid::LON_START, grid::LON_STEP, grid::LON_COUNT),
    )
}

/// Builds a grid by evaluating `value(t, row, col)` for every cell.
pub fn create_variable_grid(
    name: &str,
    coords: Coordinates,
    missing_value: Option<f32>,
    value: impl Fn(usize, usize, usize) -> f32,
) -> VariableGrid {
    let (nt, nlat, nlon) = coords.shape();
    let mut data = Vec::with_capacity(coords.len());
    for t in 0..nt {
        for row in 0..nlat {
            for col in 0..nlon {
                data.push(value(t, row, col));
            }
        }
    }
    VariableGrid::new(name, missing_value, coords, data).expect("generator shape is consistent")
}

/// Cell value of variable `index` at `(t, row, col)` in the synthetic dataset.
///
/// `offset + t + row * 0.1 + col * 0.01`, so every variable has a distinct
/// level and each time step shifts the whole field by one.
pub fn cfs_value(index: usize, t: usize, row: usize, col: usize) -> f32 {
    VARIABLE_OFFSETS[index] + t as f32 + row as f32 * 0.1 + col as f32 * 0.01
}

/// The four forecast variables as separately read grids, before merging.
pub fn create_cfs_grids(time_steps: usize) -> Vec<VariableGrid> {
    variables::NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            create_variable_grid(
                name,
                create_pnw_coords(time_steps),
                Some(variables::MISSING_VALUE),
                |t, row, col| cfs_value(index, t, row, col),
            )
        })
        .collect()
}

/// Merged synthetic dataset with all four variables.
pub fn create_cfs_dataset(time_steps: usize) -> GriddedDataset {
    GriddedDataset::merge(create_cfs_grids(time_steps)).expect("synthetic grids share coordinates")
}

/// Creates a 2-D test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Creates a 2-D grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a 2-D grid with NaN at the given `(col, row)` positions, zeros elsewhere.
pub fn create_grid_with_nans(width: usize, height: usize, nan_positions: &[(usize, usize)]) -> Vec<f64> {
    let mut data = vec![0.0; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f64::NAN;
        }
    }
    data
}

/// Creates RGBA pixel data with a gradient pattern, for PNG encoding tests.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(128);
            pixels.push(255);
        }
    }
    pixels
}
