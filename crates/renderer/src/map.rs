//! Leaflet map with a colorized median overlay.
//!
//! The output is a single HTML file. The overlay PNG is inlined as a data
//! URI and the legend as SVG; only Leaflet itself and the basemap tiles are
//! fetched by the browser.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dashboard_common::bbox::wrap_longitude;
use grid_stats::{nan_mean, SpatialGrid};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::colorize::colorize;
use crate::colormap::ColorScale;
use crate::error::{RenderError, RenderResult};
use crate::html;
use crate::legend::Legend;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Basemap and viewport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSpec {
    pub width: u32,
    pub height: u32,
    pub zoom: u8,
    /// Overlay opacity in [0, 1]
    pub opacity: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapSpec {
    fn default() -> Self {
        Self {
            width: 500,
            height: 400,
            zoom: 4,
            opacity: 0.8,
            tile_url: "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}{r}.png"
                .to_string(),
            attribution: "&copy; Stadia Maps &copy; Stamen Design &copy; OpenMapTiles &copy; OpenStreetMap contributors"
                .to_string(),
        }
    }
}

/// Where the overlay goes, in Leaflet's `[lat, lon]` order with signed longitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPlacement {
    pub center: [f64; 2],
    /// `[[south, west], [north, east]]`
    pub bounds: [[f64; 2]; 2],
}

impl MapPlacement {
    /// Centre on the mean grid coordinate, bound by the outermost grid points.
    pub fn for_grid(grid: &SpatialGrid) -> RenderResult<Self> {
        let empty = || RenderError::EmptyGrid(grid.variable.clone());
        let bbox = grid.bounds().ok_or_else(empty)?.to_signed_longitudes();
        let lat = nan_mean(&grid.latitudes);
        let lon = nan_mean(&grid.longitudes);
        if lat.is_nan() || lon.is_nan() {
            return Err(empty());
        }
        Ok(Self {
            center: [lat, wrap_longitude(lon)],
            bounds: [[bbox.min_y, bbox.min_x], [bbox.max_y, bbox.max_x]],
        })
    }
}

/// Render the map document for one variable's median grid.
pub fn render_map_html(
    spec: &MapSpec,
    grid: &SpatialGrid,
    scale: ColorScale,
    caption: &str,
) -> RenderResult<String> {
    let placement = MapPlacement::for_grid(grid)?;
    let png = colorize(grid, scale).to_png()?;
    let legend = Legend::new(caption, scale, grid.value_range());

    let js_str = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
    let [[south, west], [north, east]] = placement.bounds;

    let head = format!(
        "<link rel=\"stylesheet\" href=\"{css}\"/>\n<script src=\"{js}\"></script>\n<style>\n#map {{ width: {w}px; height: {h}px; }}\n.leaflet-image-layer {{ image-rendering: pixelated; }}\n.legend {{ background: rgba(255, 255, 255, 0.8); padding: 4px; }}\n</style>\n",
        css = LEAFLET_CSS,
        js = LEAFLET_JS,
        w = spec.width,
        h = spec.height,
    );

    let script = format!(
        "var map = L.map('map').setView([{lat:.6}, {lon:.6}], {zoom});\n\
         L.tileLayer({tiles}, {{ attribution: {attribution} }}).addTo(map);\n\
         L.imageOverlay('data:image/png;base64,{png}', [[{south:.6}, {west:.6}], [{north:.6}, {east:.6}]], {{ opacity: {opacity} }}).addTo(map);\n\
         var legend = L.control({{ position: 'topright' }});\n\
         legend.onAdd = function () {{\n  \
           var div = L.DomUtil.create('div', 'legend');\n  \
           div.appendChild(document.getElementById('legend-template').content.cloneNode(true));\n  \
           return div;\n\
         }};\n\
         legend.addTo(map);\n",
        lat = placement.center[0],
        lon = placement.center[1],
        zoom = spec.zoom,
        tiles = js_str(&spec.tile_url),
        attribution = js_str(&spec.attribution),
        png = STANDARD.encode(&png),
        opacity = spec.opacity,
    );

    let body = format!(
        "<div id=\"map\"></div>\n<template id=\"legend-template\">\n{}</template>\n<script>\n{}</script>\n",
        legend.to_svg(),
        script
    );

    debug!(
        variable = %grid.variable,
        png_bytes = png.len(),
        center = ?placement.center,
        "Rendered map"
    );

    Ok(html::document(caption, &head, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        SpatialGrid {
            variable: "sde".to_string(),
            values: vec![0.0, 1.0, 2.0, f64::NAN],
            latitudes: vec![45.0, 40.0],
            longitudes: vec![235.0, 245.0],
        }
    }

    #[test]
    fn test_placement_uses_signed_longitudes() {
        let placement = MapPlacement::for_grid(&grid()).unwrap();
        assert_eq!(placement.center, [42.5, -120.0]);
        assert_eq!(placement.bounds, [[40.0, -125.0], [45.0, -115.0]]);
    }

    #[test]
    fn test_empty_grid_is_error() {
        let mut g = grid();
        g.latitudes.clear();
        g.values.clear();
        assert!(matches!(MapPlacement::for_grid(&g), Err(RenderError::EmptyGrid(_))));
    }

    #[test]
    fn test_map_document_contents() {
        let html = render_map_html(&MapSpec::default(), &grid(), ColorScale::Cool, "Snow depth [m]").unwrap();
        assert!(html.contains("setView([42.500000, -120.000000], 4)"));
        assert!(html.contains("{ opacity: 0.8 }"));
        assert!(html.contains("data:image/png;base64,iVBORw0KGgo"));
        assert!(html.contains("Snow depth [m]"));
        assert!(html.contains("width: 500px; height: 400px;"));
    }
}
