//! Aggregation over the forecast spans using the synthetic CFS dataset.

use chrono::Duration;
use dashboard_common::{BoundingBox, ForecastSpan, TimeWindow};
use grid_stats::{space_series, time_median_grid, window_indices};
use test_utils::{assert_approx_eq, cfs_start, create_cfs_dataset, fixtures};

// ============================================================================
// Window selection
// ============================================================================

#[test]
fn test_week_window_selects_first_seven_days() {
    // 10 days of 6-hourly output.
    let dataset = create_cfs_dataset(40);
    let times = &dataset.coords().times;
    let window = TimeWindow::from_first_timestamp(times, ForecastSpan::Week).unwrap();

    let indices = window_indices(times, &window);

    assert_eq!(indices.len(), fixtures::time::STEPS_PER_WEEK);
    assert_eq!(indices[0], 0);
    assert_eq!(times[*indices.last().unwrap()], cfs_start() + Duration::hours(162));
    assert!(!indices.contains(&28), "T0 + 7 days is outside the half-open window");
}

#[test]
fn test_window_lengths_per_span() {
    let dataset = create_cfs_dataset(130);
    let times = &dataset.coords().times;

    let counts: Vec<usize> = ForecastSpan::ALL
        .iter()
        .map(|span| {
            let window = TimeWindow::from_first_timestamp(times, *span).unwrap();
            window_indices(times, &window).len()
        })
        .collect();

    assert_eq!(
        counts,
        vec![
            fixtures::time::STEPS_PER_DAY,
            fixtures::time::STEPS_PER_WEEK,
            fixtures::time::STEPS_PER_MONTH
        ]
    );
}

#[test]
fn test_short_axis_uses_what_is_available() {
    let dataset = create_cfs_dataset(10);
    let times = &dataset.coords().times;
    let window = TimeWindow::from_first_timestamp(times, ForecastSpan::Month).unwrap();
    assert_eq!(window_indices(times, &window).len(), 10);
}

// ============================================================================
// Reductions
// ============================================================================

#[test]
fn test_week_series_tracks_field_shift() {
    let dataset = create_cfs_dataset(40);
    let window =
        TimeWindow::from_first_timestamp(&dataset.coords().times, ForecastSpan::Week).unwrap();

    let series = space_series(&dataset, "prate", &window).unwrap();

    assert_eq!(series.len(), 28);
    assert_eq!(series.variable, "prate");
    // Each step adds 1.0 to every cell: median shifts, spread stays put.
    for t in 1..series.len() {
        assert_approx_eq!(series.median[t] - series.median[0], t as f64, 1e-3);
        assert_approx_eq!(series.std[t], series.std[0], 1e-3);
    }
    for t in 0..series.len() {
        assert_approx_eq!(series.low[t], series.median[t] - series.std[t], 1e-9);
        assert_approx_eq!(series.high[t], series.median[t] + series.std[t], 1e-9);
    }
}

#[test]
fn test_week_time_median_grid() {
    let dataset = create_cfs_dataset(40);
    let window =
        TimeWindow::from_first_timestamp(&dataset.coords().times, ForecastSpan::Week).unwrap();

    let grid = time_median_grid(&dataset, "sde", &window).unwrap();

    assert_eq!(grid.height(), fixtures::grid::LAT_COUNT);
    assert_eq!(grid.width(), fixtures::grid::LON_COUNT);
    // Median of t = 0..27 is 13.5; sde is offset by 10.
    assert_approx_eq!(grid.get(0, 0).unwrap(), 23.5, 1e-4);
    assert_approx_eq!(grid.get(2, 3).unwrap(), 23.5 + 0.2 + 0.03, 1e-4);
}

#[test]
fn test_cropped_median_grid_matches_crop_shape() {
    let (x0, y0, x1, y1) = fixtures::bbox::PACIFIC_NORTHWEST;
    let dataset = create_cfs_dataset(8)
        .mask_missing()
        .crop(&BoundingBox::new(x0, y0, x1, y1))
        .unwrap();
    let window =
        TimeWindow::from_first_timestamp(&dataset.coords().times, ForecastSpan::Day).unwrap();

    let grid = time_median_grid(&dataset, "t", &window).unwrap();

    assert_eq!((grid.height(), grid.width()), fixtures::grid::CROPPED_SHAPE);
    assert!(grid.latitudes.iter().all(|&lat| lat > 35.0 && lat < 50.0));
    assert!(grid.longitudes.iter().all(|&lon| lon > 230.0 && lon < 250.0));
}

#[test]
fn test_masked_cells_do_not_reach_series() {
    use dashboard_common::GriddedDataset;
    use test_utils::{create_cfs_grids, fixtures::variables::MISSING_VALUE};

    let mut grids = create_cfs_grids(4);
    // Poison the whole first slice of `t` with the missing marker.
    let cells = grids[2].coords.cells_per_slice();
    grids[2].data[..cells].fill(MISSING_VALUE);
    let dataset = GriddedDataset::merge(grids).unwrap().mask_missing();
    let window =
        TimeWindow::from_first_timestamp(&dataset.coords().times, ForecastSpan::Day).unwrap();

    let series = space_series(&dataset, "t", &window).unwrap();

    assert!(series.median[0].is_nan());
    assert!(series.std[0].is_nan());
    assert!(series.median[1] > 270.0 && series.median[1] < 275.0);
}
