//! Turning a median grid into an RGBA overlay.

use grid_stats::{nan_min_max, SpatialGrid};

use crate::color::Color;
use crate::colormap::{lut_index, ColorScale};
use crate::error::RenderResult;
use crate::png;

/// Scale values to [0, 1] by their NaN-ignoring min and max.
///
/// NaN stays NaN. If every valid value is equal, they all map to 0.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = nan_min_max(values) else {
        return values.to_vec();
    };
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                v
            } else if range > 0.0 {
                (v - min) / range
            } else {
                0.0
            }
        })
        .collect()
}

/// RGBA pixels, 4 bytes per pixel, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Raster {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        png::create_png_auto(&self.pixels, self.width, self.height)
    }
}

/// Normalize `grid` and map it through `scale`.
///
/// NaN cells are fully transparent. The first image row is the northernmost
/// latitude, so grids stored south-to-north are flipped.
pub fn colorize(grid: &SpatialGrid, scale: ColorScale) -> Raster {
    let (width, height) = (grid.width(), grid.height());
    let normalized = normalize(&grid.values);
    let lut = scale.lut();
    let flip = ascending(&grid.latitudes);

    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row = if flip { height - 1 - y } else { y };
        for x in 0..width {
            let color = lut_index(normalized[row * width + x])
                .map(|i| lut[i])
                .unwrap_or_else(Color::transparent);
            pixels.extend_from_slice(&color.to_rgba_bytes());
        }
    }

    Raster {
        width,
        height,
        pixels,
    }
}

fn ascending(latitudes: &[f64]) -> bool {
    match (latitudes.first(), latitudes.last()) {
        (Some(first), Some(last)) => first < last,
        _ => false,
    }
}
