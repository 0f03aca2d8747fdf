//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// `x` is longitude and `y` is latitude. Longitudes follow whatever convention
/// the source grids use (0..360 for CFS output).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Pacific Northwest crop used by the dashboard (lon 230..250, lat 35..50).
    pub fn pacific_northwest() -> Self {
        Self::new(230.0, 35.0, 250.0, 50.0)
    }

    /// Parse a comma separated "minx,miny,maxx,maxy" string.
    pub fn from_csv(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
        };

        Ok(Self {
            min_x: parse(parts[0])?,
            min_y: parse(parts[1])?,
            max_x: parse(parts[2])?,
            max_y: parse(parts[3])?,
        })
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// A box is valid when both extents are positive and finite.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Check if a point lies within the box, edges included.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Open-interval longitude test: `min_x < x < max_x`.
    pub fn strictly_contains_x(&self, x: f64) -> bool {
        x > self.min_x && x < self.max_x
    }

    /// Open-interval latitude test: `min_y < y < max_y`.
    pub fn strictly_contains_y(&self, y: f64) -> bool {
        y > self.min_y && y < self.max_y
    }

    /// Open-interval point test, used for cropping.
    pub fn strictly_contains_point(&self, x: f64, y: f64) -> bool {
        self.strictly_contains_x(x) && self.strictly_contains_y(y)
    }

    /// Smallest box enclosing all the given coordinates, or `None` if either
    /// slice is empty.
    pub fn enclosing(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let (min_x, max_x) = finite_extent(xs)?;
        let (min_y, max_y) = finite_extent(ys)?;
        Some(Self::new(min_x, min_y, max_x, max_y))
    }

    /// Same box with longitudes shifted into the -180..180 convention.
    pub fn to_signed_longitudes(&self) -> Self {
        let min_x = wrap_longitude(self.min_x);
        let mut max_x = wrap_longitude(self.max_x);
        if max_x < min_x {
            // Box straddles the antimeridian; keep it contiguous.
            max_x += 360.0;
        }
        Self::new(min_x, self.min_y, max_x, self.max_y)
    }
}

/// Wrap a longitude into -180..=180, leaving +180 as is.
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}
