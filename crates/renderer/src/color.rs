//! RGBA colors and their textual forms.

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// From unit-interval channels, rounding to the nearest byte.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(byte(r), byte(g), byte(b))
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> RenderResult<Self> {
        let digits = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        };
        match (digits.len(), channel(0..2), channel(2..4), channel(4..6)) {
            (6, Some(r), Some(g), Some(b)) => Ok(Self::rgb(r, g, b)),
            _ => Err(RenderError::InvalidColor(hex.to_string())),
        }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
