//! Named color scales sampled into 256-entry lookup tables.
//!
//! The scales reproduce the matplotlib colormaps of the same name: `Blues`
//! and `GnBu` are nine-color sequential ramps, `cool` runs cyan to magenta,
//! and `coolwarm` is a diverging blue-grey-red ramp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::RenderError;

/// Number of entries in a sampled color scale.
pub const LUT_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorScale {
    #[serde(rename = "Blues")]
    Blues,
    #[serde(rename = "cool")]
    Cool,
    #[serde(rename = "coolwarm")]
    Coolwarm,
    #[serde(rename = "GnBu")]
    GnBu,
}

const BLUES_HEX: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

const GNBU_HEX: [&str; 9] = [
    "#f7fcf0", "#e0f3db", "#ccebc5", "#a8ddb5", "#7bccc4", "#4eb3d3", "#2b8cbe", "#0868ac",
    "#084081",
];

const COOLWARM_STOPS: [(f64, [f64; 3]); 9] = [
    (0.0, [0.2298, 0.2987, 0.7537]),
    (0.125, [0.3843, 0.5098, 0.9176]),
    (0.25, [0.5529, 0.6902, 0.9955]),
    (0.375, [0.7216, 0.8157, 0.9765]),
    (0.5, [0.8654, 0.8654, 0.8654]),
    (0.625, [0.9569, 0.7686, 0.6784]),
    (0.75, [0.9566, 0.5975, 0.4796]),
    (0.875, [0.8706, 0.3765, 0.3020]),
    (1.0, [0.7057, 0.0156, 0.1502]),
];

impl ColorScale {
    pub const ALL: [ColorScale; 4] = [
        ColorScale::Blues,
        ColorScale::Cool,
        ColorScale::Coolwarm,
        ColorScale::GnBu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorScale::Blues => "Blues",
            ColorScale::Cool => "cool",
            ColorScale::Coolwarm => "coolwarm",
            ColorScale::GnBu => "GnBu",
        }
    }

    /// Gradient stops as `(position, [r, g, b])` with channels in [0, 1].
    fn stops(&self) -> Vec<(f64, [f64; 3])> {
        match self {
            ColorScale::Blues => evenly_spaced(&BLUES_HEX),
            ColorScale::GnBu => evenly_spaced(&GNBU_HEX),
            ColorScale::Cool => vec![(0.0, [0.0, 1.0, 1.0]), (1.0, [1.0, 0.0, 1.0])],
            ColorScale::Coolwarm => COOLWARM_STOPS.to_vec(),
        }
    }

    /// Continuous evaluation of the gradient at `x` in [0, 1].
    pub fn sample(&self, x: f64) -> Color {
        let stops = self.stops();
        let x = x.clamp(0.0, 1.0);
        let upper = stops
            .iter()
            .position(|(pos, _)| *pos >= x)
            .unwrap_or(stops.len() - 1)
            .max(1);
        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let t = if p1 > p0 { (x - p0) / (p1 - p0) } else { 0.0 };
        let lerp = |i: usize| c0[i] + (c1[i] - c0[i]) * t;
        Color::from_unit(lerp(0), lerp(1), lerp(2))
    }

    /// The scale sampled at `i / 255` for `i` in `0..256`.
    pub fn lut(&self) -> Vec<Color> {
        (0..LUT_SIZE)
            .map(|i| self.sample(i as f64 / (LUT_SIZE - 1) as f64))
            .collect()
    }

    /// Entry `index` of the lookup table, as used for chart band colors.
    pub fn color_at_index(&self, index: u8) -> Color {
        self.sample(index as f64 / (LUT_SIZE - 1) as f64)
    }
}

/// Lookup-table slot for a normalized value: `min(floor(x * 256), 255)`.
///
/// Values outside [0, 1] are clamped; NaN has no slot.
pub fn lut_index(x: f64) -> Option<usize> {
    if x.is_nan() {
        return None;
    }
    let scaled = (x.clamp(0.0, 1.0) * LUT_SIZE as f64).floor() as usize;
    Some(scaled.min(LUT_SIZE - 1))
}

fn evenly_spaced(hex: &[&str]) -> Vec<(f64, [f64; 3])> {
    let last = (hex.len() - 1) as f64;
    hex.iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let c = Color::from_hex(h).ok()?;
            Some((
                i as f64 / last,
                [c.r as f64 / 255.0, c.g as f64 / 255.0, c.b as f64 / 255.0],
            ))
        })
        .collect()
}

impl fmt::Display for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScale {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorScale::ALL
            .into_iter()
            .find(|scale| scale.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RenderError::UnknownColorScale(s.to_string()))
    }
}
