//! Chart and map documents built from the synthetic forecast dataset.

use dashboard_common::{BoundingBox, ForecastSpan, GriddedDataset, TimeWindow};
use grid_stats::{space_series, time_median_grid};
use renderer::html::format_number;
use renderer::{render_chart_html, render_map_html, ChartSpec, ColorScale, MapSpec};
use test_utils::{create_cfs_dataset, fixtures};

fn cropped(time_steps: usize) -> GriddedDataset {
    let (x0, y0, x1, y1) = fixtures::bbox::PACIFIC_NORTHWEST;
    create_cfs_dataset(time_steps)
        .mask_missing()
        .crop(&BoundingBox::new(x0, y0, x1, y1))
        .unwrap()
}

fn window(dataset: &GriddedDataset, span: ForecastSpan) -> TimeWindow {
    TimeWindow::from_first_timestamp(&dataset.coords().times, span).unwrap()
}

// ============================================================================
// Chart
// ============================================================================

#[test]
fn test_chart_document_structure() {
    let dataset = cropped(8);
    let series = space_series(&dataset, "t", &window(&dataset, ForecastSpan::Day)).unwrap();
    let color = ColorScale::Coolwarm.color_at_index(150);
    let spec = ChartSpec::for_variable("t", "Air temperature [K]", ForecastSpan::Day, color);

    let html = render_chart_html(&spec, &series).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Median and standard deviation of t for the next Day</title>"));
    assert!(html.contains("width=\"800\" height=\"500\""));
    assert!(html.contains(">Air temperature [K]</text>"));
    assert!(html.contains(">standard deviation</text>"));
    assert!(html.contains(">median</text>"));
    assert!(html.contains(&format!("fill=\"{}\"", color.to_hex())));
    // One tooltip per timestamp in the day window.
    assert_eq!(html.matches("<circle").count(), fixtures::time::STEPS_PER_DAY);
}

#[test]
fn test_chart_tooltips_carry_series_values() {
    let dataset = cropped(8);
    let series = space_series(&dataset, "watr", &window(&dataset, ForecastSpan::Day)).unwrap();
    let spec = ChartSpec::for_variable("watr", "Water runoff [kg m^-2]", ForecastSpan::Day, ColorScale::GnBu.color_at_index(150));

    let html = render_chart_html(&spec, &series).unwrap();

    for median in &series.median {
        assert!(html.contains(&format!("median {},", format_number(*median))));
    }
    assert!(html.contains("2022-11-30 00:00 UTC"));
}

#[test]
fn test_chart_is_deterministic() {
    let dataset = cropped(30);
    let series = space_series(&dataset, "prate", &window(&dataset, ForecastSpan::Week)).unwrap();
    let spec = ChartSpec::for_variable("prate", "p", ForecastSpan::Week, ColorScale::Blues.color_at_index(150));

    assert_eq!(
        render_chart_html(&spec, &series).unwrap(),
        render_chart_html(&spec, &series).unwrap()
    );
}

// ============================================================================
// Map
// ============================================================================

#[test]
fn test_map_centered_on_cropped_domain() {
    let dataset = cropped(4);
    let grid = time_median_grid(&dataset, "sde", &window(&dataset, ForecastSpan::Day)).unwrap();

    let html = render_map_html(&MapSpec::default(), &grid, ColorScale::Cool, "Snow depth [m]").unwrap();

    // Cropped lat 36..49 and lon 231..249 (signed -129..-111).
    assert!(html.contains("setView([42.500000, -120.000000], 4)"));
    assert!(html.contains("[[36.000000, -129.000000], [49.000000, -111.000000]]"));
    assert!(html.contains("L.tileLayer(\"https://tiles.stadiamaps.com/"));
}

#[test]
fn test_map_legend_spans_median_range() {
    let dataset = cropped(4);
    let grid = time_median_grid(&dataset, "t", &window(&dataset, ForecastSpan::Day)).unwrap();
    let (vmin, vmax) = grid.value_range().unwrap();

    let html = render_map_html(&MapSpec::default(), &grid, ColorScale::Coolwarm, "Air temperature [K]").unwrap();

    assert!(html.contains(&format!(">{}</text>", format_number(vmin))));
    assert!(html.contains(&format!(">{}</text>", format_number(vmax))));
    assert!(html.contains(">Air temperature [K]</text>"));
}

#[test]
fn test_map_settings_are_applied() {
    let dataset = cropped(4);
    let grid = time_median_grid(&dataset, "prate", &window(&dataset, ForecastSpan::Day)).unwrap();
    let spec = MapSpec {
        width: 640,
        height: 480,
        zoom: 6,
        opacity: 0.5,
        tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
        attribution: "OSM".to_string(),
    };

    let html = render_map_html(&spec, &grid, ColorScale::Blues, "rate").unwrap();

    assert!(html.contains("width: 640px; height: 480px;"));
    assert!(html.contains("], 6);"));
    assert!(html.contains("{ opacity: 0.5 }"));
    assert!(html.contains("\"https://tile.openstreetmap.org/{z}/{x}/{y}.png\""));
}
