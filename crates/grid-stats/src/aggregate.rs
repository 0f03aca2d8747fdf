//! Window selection and the two figure reductions.

use chrono::{DateTime, Utc};
use dashboard_common::{BoundingBox, GriddedDataset, TimeWindow};
use tracing::debug;

use crate::error::{StatsError, StatsResult};
use crate::reduce::{median_in_place, nan_median, nan_min_max, nan_std};

/// Per-cell medians over a time window, laid out `[lat][lon]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialGrid {
    pub variable: String,
    pub values: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl SpatialGrid {
    pub fn width(&self) -> usize {
        self.longitudes.len()
    }

    pub fn height(&self) -> usize {
        self.latitudes.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(self.values[row * self.width() + col])
    }

    /// NaN-ignoring `(min, max)` of the medians; `None` if every cell is NaN.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        nan_min_max(&self.values)
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.longitudes, &self.latitudes)
    }
}

/// Spatial median and spread of one variable per timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSeries {
    pub variable: String,
    pub times: Vec<DateTime<Utc>>,
    pub median: Vec<f64>,
    pub std: Vec<f64>,
    /// `median - std`
    pub low: Vec<f64>,
    /// `median + std`
    pub high: Vec<f64>,
}

impl AggregateSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// NaN-ignoring range covering both band edges and the median line.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let lows = nan_min_max(&self.low);
        let highs = nan_min_max(&self.high);
        let medians = nan_min_max(&self.median);
        [lows, highs, medians]
            .into_iter()
            .flatten()
            .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
    }
}

/// Indices of `times` inside the half-open window.
pub fn window_indices(times: &[DateTime<Utc>], window: &TimeWindow) -> Vec<usize> {
    window.indices(times)
}

fn non_empty_window(dataset: &GriddedDataset, window: &TimeWindow) -> StatsResult<Vec<usize>> {
    let indices = window_indices(&dataset.coords().times, window);
    if indices.is_empty() {
        return Err(StatsError::EmptyWindow {
            start: window.start.to_rfc3339(),
            end: window.end.to_rfc3339(),
        });
    }
    Ok(indices)
}

/// Median over the window's timestamps for every grid cell.
///
/// A cell with no valid sample in the window has a NaN median.
pub fn time_median_grid(
    dataset: &GriddedDataset,
    variable: &str,
    window: &TimeWindow,
) -> StatsResult<SpatialGrid> {
    let data = dataset.variable(variable)?;
    let coords = dataset.coords();
    let cells = coords.cells_per_slice();
    let indices = non_empty_window(dataset, window)?;

    let mut samples = Vec::with_capacity(indices.len());
    let values = (0..cells)
        .map(|cell| {
            samples.clear();
            samples.extend(
                indices
                    .iter()
                    .map(|&t| data.data[t * cells + cell] as f64)
                    .filter(|v| !v.is_nan()),
            );
            median_in_place(&mut samples)
        })
        .collect();

    debug!(
        variable,
        timestamps = indices.len(),
        cells,
        "Computed per-cell time median"
    );

    Ok(SpatialGrid {
        variable: variable.to_string(),
        values,
        latitudes: coords.latitudes.clone(),
        longitudes: coords.longitudes.clone(),
    })
}

/// Spatial median and population standard deviation for each timestamp in the window.
///
/// A slice with no valid cells yields NaN for both; its row is kept.
pub fn space_series(
    dataset: &GriddedDataset,
    variable: &str,
    window: &TimeWindow,
) -> StatsResult<AggregateSeries> {
    let data = dataset.variable(variable)?;
    let coords = dataset.coords();
    let cells = coords.cells_per_slice();
    let indices = non_empty_window(dataset, window)?;

    let mut series = AggregateSeries {
        variable: variable.to_string(),
        times: Vec::with_capacity(indices.len()),
        median: Vec::with_capacity(indices.len()),
        std: Vec::with_capacity(indices.len()),
        low: Vec::with_capacity(indices.len()),
        high: Vec::with_capacity(indices.len()),
    };

    for &t in &indices {
        let slice = data.time_slice(t, cells);
        let median = nan_median(slice);
        let std = nan_std(slice);
        series.times.push(coords.times[t]);
        series.median.push(median);
        series.std.push(std);
        series.low.push(median - std);
        series.high.push(median + std);
    }

    debug!(variable, timestamps = series.len(), "Computed spatial series");

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use dashboard_common::{Coordinates, ForecastSpan, VariableGrid};

    fn small_dataset(data: Vec<f32>) -> GriddedDataset {
        let t0 = Utc.with_ymd_and_hms(2022, 11, 30, 0, 0, 0).unwrap();
        let coords = Coordinates::new(
            vec![t0, t0 + Duration::hours(6), t0 + Duration::hours(12)],
            vec![40.0],
            vec![235.0, 236.0],
        );
        let grid = VariableGrid::new("t", None, coords, data).unwrap();
        GriddedDataset::merge(vec![grid]).unwrap()
    }

    fn day(dataset: &GriddedDataset) -> TimeWindow {
        TimeWindow::from_first_timestamp(&dataset.coords().times, ForecastSpan::Day).unwrap()
    }

    #[test]
    fn test_time_median_per_cell() {
        let ds = small_dataset(vec![1.0, 10.0, 3.0, 30.0, 2.0, 20.0]);
        let grid = time_median_grid(&ds, "t", &day(&ds)).unwrap();
        assert_eq!(grid.values, vec![2.0, 20.0]);
        assert_eq!(grid.get(0, 1), Some(20.0));
        assert_eq!(grid.get(1, 0), None);
    }

    #[test]
    fn test_time_median_all_nan_cell() {
        let nan = f32::NAN;
        let ds = small_dataset(vec![nan, 1.0, nan, 2.0, nan, 4.0]);
        let grid = time_median_grid(&ds, "t", &day(&ds)).unwrap();
        assert!(grid.values[0].is_nan());
        assert_eq!(grid.values[1], 2.0);
        assert_eq!(grid.value_range(), Some((2.0, 2.0)));
    }

    #[test]
    fn test_space_series_keeps_empty_slice() {
        let nan = f32::NAN;
        let ds = small_dataset(vec![1.0, 3.0, nan, nan, 5.0, 5.0]);
        let series = space_series(&ds, "t", &day(&ds)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.median[0], 2.0);
        assert_eq!(series.std[0], 1.0);
        assert_eq!(series.low[0], 1.0);
        assert_eq!(series.high[0], 3.0);
        assert!(series.median[1].is_nan());
        assert!(series.std[1].is_nan());
        assert_eq!(series.std[2], 0.0);
    }

    #[test]
    fn test_window_outside_axis_is_error() {
        let ds = small_dataset(vec![0.0; 6]);
        let later = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let window = TimeWindow::starting_at(later, ForecastSpan::Day);
        assert!(matches!(
            space_series(&ds, "t", &window),
            Err(StatsError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_unknown_variable() {
        let ds = small_dataset(vec![0.0; 6]);
        let result = time_median_grid(&ds, "prate", &day(&ds));
        assert!(matches!(result, Err(StatsError::Dataset(_))));
    }
}
