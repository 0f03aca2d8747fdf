//! Tests for normalization, color scales and raster layout.

use grid_stats::SpatialGrid;
use renderer::colormap::{lut_index, LUT_SIZE};
use renderer::{colorize, normalize, Color, ColorScale};
use test_utils::{assert_approx_eq, create_constant_grid, create_grid_with_nans, create_test_grid};

fn spatial(values: Vec<f64>, width: usize, height: usize) -> SpatialGrid {
    SpatialGrid {
        variable: "watr".to_string(),
        values,
        latitudes: (0..height).map(|i| 49.0 - i as f64).collect(),
        longitudes: (0..width).map(|i| 231.0 + i as f64).collect(),
    }
}

// ============================================================================
// normalize
// ============================================================================

#[test]
fn test_normalized_values_stay_in_unit_interval() {
    let mut values = create_test_grid(12, 7);
    values[5] = f64::NAN;
    values[40] = f64::NAN;

    let normalized = normalize(&values);

    let valid: Vec<f64> = normalized.iter().copied().filter(|v| !v.is_nan()).collect();
    assert!(valid.iter().all(|v| (0.0..=1.0).contains(v)));
    assert_approx_eq!(valid.iter().cloned().fold(f64::INFINITY, f64::min), 0.0, 1e-12);
    assert_approx_eq!(valid.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 1.0, 1e-12);
    assert!(normalized[5].is_nan() && normalized[40].is_nan());
    assert_eq!(valid.len(), values.len() - 2);
}

#[test]
fn test_normalize_constant_grid_maps_to_zero() {
    let normalized = normalize(&create_constant_grid(4, 3, 273.15));
    assert!(normalized.iter().all(|&v| v == 0.0));
}

#[test]
fn test_normalize_preserves_order() {
    let values = vec![3.0, -1.0, 10.0, 2.5];
    let normalized = normalize(&values);
    for i in 0..values.len() {
        for j in 0..values.len() {
            if values[i] < values[j] {
                assert!(normalized[i] < normalized[j]);
            }
        }
    }
}

// ============================================================================
// Color scales
// ============================================================================

#[test]
fn test_chart_band_colors() {
    assert_eq!(ColorScale::Cool.color_at_index(50), Color::rgb(50, 205, 255));
    // Blues@150 falls between #6baed6 (index 127.5) and #4292c6 (index 159.4).
    let blue = ColorScale::Blues.color_at_index(150);
    assert!(blue.r < 0x6b && blue.r > 0x42);
    assert!(blue.b < 0xd6 && blue.b > 0xc6);
}

#[test]
fn test_every_scale_has_full_lut() {
    for scale in ColorScale::ALL {
        let lut = scale.lut();
        assert_eq!(lut.len(), LUT_SIZE);
        assert!(lut.iter().all(|c| c.a == 255));
        assert_eq!(lut[0], scale.sample(0.0));
        assert_eq!(lut[LUT_SIZE - 1], scale.sample(1.0));
    }
}

#[test]
fn test_lut_index_boundaries() {
    assert_eq!(lut_index(0.0039), Some(0));
    assert_eq!(lut_index(0.0040), Some(1));
    assert_eq!(lut_index(0.999), Some(255));
}

// ============================================================================
// colorize
// ============================================================================

#[test]
fn test_colorize_extremes_hit_lut_ends() {
    let grid = spatial(create_test_grid(5, 4), 5, 4);
    let raster = colorize(&grid, ColorScale::GnBu);
    let lut = ColorScale::GnBu.lut();

    assert_eq!((raster.width, raster.height), (5, 4));
    assert_eq!(raster.pixel(0, 0).unwrap(), lut[0].to_rgba_bytes());
    assert_eq!(raster.pixel(4, 3).unwrap(), lut[255].to_rgba_bytes());
}

#[test]
fn test_colorize_masks_nan_cells() {
    let mut values = create_grid_with_nans(4, 3, &[(0, 0), (3, 2)]);
    values[5] = 1.0;
    let raster = colorize(&spatial(values, 4, 3), ColorScale::Blues);

    assert_eq!(raster.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(raster.pixel(3, 2).unwrap()[3], 0);
    assert_eq!(raster.pixel(1, 1).unwrap()[3], 255);
    assert_eq!(raster.pixels.chunks(4).filter(|p| p[3] == 0).count(), 2);
}
