//! Horizontal colorbar legend for map overlays.

use crate::colormap::{ColorScale, LUT_SIZE};
use crate::html::{escape, format_number, px};

const DEFAULT_TICKS: usize = 5;
const BAR_WIDTH: f64 = 400.0;
const BAR_HEIGHT: f64 = 12.0;
const MARGIN: f64 = 20.0;

/// A colorbar covering `[vmin, vmax]` with a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub caption: String,
    pub scale: ColorScale,
    /// `None` when the grid held no valid values
    pub range: Option<(f64, f64)>,
    pub tick_count: usize,
}

impl Legend {
    pub fn new(caption: impl Into<String>, scale: ColorScale, range: Option<(f64, f64)>) -> Self {
        Self {
            caption: caption.into(),
            scale,
            range,
            tick_count: DEFAULT_TICKS,
        }
    }

    pub fn with_ticks(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Evenly spaced values from vmin to vmax, both ends included.
    pub fn tick_values(&self) -> Vec<f64> {
        let Some((vmin, vmax)) = self.range else {
            return Vec::new();
        };
        match self.tick_count {
            0 => Vec::new(),
            1 => vec![vmin],
            n => (0..n)
                .map(|i| vmin + (vmax - vmin) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }

    /// Inline SVG: one rect per LUT entry, tick marks and labels below, caption underneath.
    pub fn to_svg(&self) -> String {
        let width = BAR_WIDTH + 2.0 * MARGIN;
        let height = BAR_HEIGHT + 50.0;
        let step = BAR_WIDTH / LUT_SIZE as f64;

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"legend\" width=\"{}\" height=\"{}\">\n",
            px(width),
            px(height)
        );
        svg.push_str("<g shape-rendering=\"crispEdges\">\n");
        for (i, color) in self.scale.lut().iter().enumerate() {
            svg.push_str(&format!(
                "<rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                px(MARGIN + i as f64 * step),
                px(step + 0.01),
                px(BAR_HEIGHT),
                color.to_hex()
            ));
        }
        svg.push_str("</g>\n");

        let ticks = self.tick_values();
        let denom = ticks.len().saturating_sub(1).max(1) as f64;
        for (i, value) in ticks.iter().enumerate() {
            let x = MARGIN + BAR_WIDTH * i as f64 / denom;
            svg.push_str(&format!(
                "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"#000\"/>\n",
                px(BAR_HEIGHT),
                px(BAR_HEIGHT + 4.0),
                x = px(x)
            ));
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"10\" text-anchor=\"middle\">{}</text>\n",
                px(x),
                px(BAR_HEIGHT + 16.0),
                format_number(*value)
            ));
        }

        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"11\">{}</text>\n",
            px(MARGIN),
            px(BAR_HEIGHT + 34.0),
            escape(&self.caption)
        ));
        svg.push_str("</svg>\n");
        svg
    }
}
