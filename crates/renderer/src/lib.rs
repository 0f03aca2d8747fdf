//! Figure rendering for the climate dashboard.
//!
//! Produces the two self-contained HTML documents made for each variable:
//! - a chart of the spatial median with a ±1 standard deviation band
//!   ([`chart`])
//! - a Leaflet map with the colorized time-median grid and a colorbar legend
//!   ([`map`])
//!
//! Rasters are encoded with the in-crate PNG writer ([`png`]).

pub mod chart;
pub mod color;
pub mod colorize;
pub mod colormap;
pub mod error;
pub mod html;
pub mod legend;
pub mod map;
pub mod png;

pub use chart::{render_chart_html, render_chart_svg, ChartSpec};
pub use color::Color;
pub use colorize::{colorize, normalize, Raster};
pub use colormap::ColorScale;
pub use error::{RenderError, RenderResult};
pub use legend::Legend;
pub use map::{render_map_html, MapPlacement, MapSpec};
