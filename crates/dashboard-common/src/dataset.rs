//! Labelled (time, latitude, longitude) grids and the merged dataset.
//!
//! Data is stored row-major as `[time][lat][lon]`, matching the on-disk layout
//! of the CFS forecast files, so a single timestamp is one contiguous slice.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::bbox::BoundingBox;
use crate::error::{DatasetError, DatasetResult};

/// Tolerance when comparing coordinate values from different files.
const COORD_TOLERANCE: f64 = 1e-6;

/// Shared coordinate axes of a gridded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub times: Vec<DateTime<Utc>>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl Coordinates {
    pub fn new(times: Vec<DateTime<Utc>>, latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            times,
            latitudes,
            longitudes,
        }
    }

    /// Number of cells in one time slice.
    pub fn cells_per_slice(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    /// Total number of values a variable on these axes holds.
    pub fn len(&self) -> usize {
        self.times.len() * self.cells_per_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(time, lat, lon)` lengths.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.times.len(), self.latitudes.len(), self.longitudes.len())
    }

    /// Whether two coordinate sets describe the same grid.
    pub fn matches(&self, other: &Coordinates) -> bool {
        self.times == other.times
            && axis_matches(&self.latitudes, &other.latitudes)
            && axis_matches(&self.longitudes, &other.longitudes)
    }

    /// Extent of the spatial axes.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.longitudes, &self.latitudes)
    }

    /// Mean latitude and longitude of the domain, ignoring non-finite values.
    pub fn center(&self) -> Option<(f64, f64)> {
        Some((finite_mean(&self.latitudes)?, finite_mean(&self.longitudes)?))
    }

    /// True when latitude decreases along its axis (row 0 is the northern edge).
    pub fn latitudes_descending(&self) -> bool {
        match (self.latitudes.first(), self.latitudes.last()) {
            (Some(first), Some(last)) => first > last,
            _ => false,
        }
    }
}

fn axis_matches(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= COORD_TOLERANCE)
}

fn finite_mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// A single variable read from one file, still carrying its own coordinates.
#[derive(Debug, Clone)]
pub struct VariableGrid {
    pub name: String,
    /// Sentinel meaning "no data", as declared by the source file.
    pub missing_value: Option<f32>,
    pub coords: Coordinates,
    pub data: Vec<f32>,
}

impl VariableGrid {
    pub fn new(
        name: impl Into<String>,
        missing_value: Option<f32>,
        coords: Coordinates,
        data: Vec<f32>,
    ) -> DatasetResult<Self> {
        let name = name.into();
        if data.len() != coords.len() {
            return Err(DatasetError::ShapeMismatch {
                name,
                expected: coords.len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            name,
            missing_value,
            coords,
            data,
        })
    }
}

/// One variable inside a merged dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVariable {
    pub name: String,
    pub missing_value: Option<f32>,
    pub data: Vec<f32>,
}

impl DataVariable {
    /// Values of time slice `t`, laid out `[lat][lon]`.
    pub fn time_slice(&self, t: usize, cells_per_slice: usize) -> &[f32] {
        let start = t * cells_per_slice;
        &self.data[start..start + cells_per_slice]
    }
}

/// Several variables on one shared coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedDataset {
    coords: Coordinates,
    variables: Vec<DataVariable>,
}

impl GriddedDataset {
    /// Merge independently read grids, preserving their order.
    ///
    /// Every grid must sit on the coordinates of the first one.
    pub fn merge(grids: Vec<VariableGrid>) -> DatasetResult<Self> {
        let mut iter = grids.into_iter();
        let first = iter.next().ok_or(DatasetError::NoVariables)?;
        let coords = first.coords;
        let mut variables = vec![DataVariable {
            name: first.name,
            missing_value: first.missing_value,
            data: first.data,
        }];

        for grid in iter {
            if variables.iter().any(|v| v.name == grid.name) {
                return Err(DatasetError::DuplicateVariable(grid.name));
            }
            if !coords.matches(&grid.coords) {
                return Err(DatasetError::CoordinateMismatch(grid.name));
            }
            variables.push(DataVariable {
                name: grid.name,
                missing_value: grid.missing_value,
                data: grid.data,
            });
        }

        debug!(
            variables = variables.len(),
            shape = ?coords.shape(),
            "Merged gridded dataset"
        );

        Ok(Self { coords, variables })
    }

    pub fn coords(&self) -> &Coordinates {
        &self.coords
    }

    pub fn variables(&self) -> &[DataVariable] {
        &self.variables
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn variable(&self, name: &str) -> DatasetResult<&DataVariable> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| DatasetError::UnknownVariable(name.to_string()))
    }

    /// Replace every cell equal to its variable's missing-value marker with NaN.
    pub fn mask_missing(mut self) -> Self {
        for variable in &mut self.variables {
            let Some(marker) = variable.missing_value else {
                continue;
            };
            let mut masked = 0usize;
            for value in variable.data.iter_mut() {
                if *value == marker {
                    *value = f32::NAN;
                    masked += 1;
                }
            }
            debug!(variable = %variable.name, masked, "Masked missing values");
        }
        self
    }

    /// Keep only the cells strictly inside `bbox`; everything else is dropped.
    pub fn crop(&self, bbox: &BoundingBox) -> DatasetResult<Self> {
        if !bbox.is_valid() {
            return Err(DatasetError::InvalidBoundingBox(format!("{:?}", bbox)));
        }

        let lat_idx: Vec<usize> = self
            .coords
            .latitudes
            .iter()
            .enumerate()
            .filter(|&(_, &lat)| bbox.strictly_contains_y(lat))
            .map(|(i, _)| i)
            .collect();
        let lon_idx: Vec<usize> = self
            .coords
            .longitudes
            .iter()
            .enumerate()
            .filter(|&(_, &lon)| bbox.strictly_contains_x(lon))
            .map(|(i, _)| i)
            .collect();

        if lat_idx.is_empty() || lon_idx.is_empty() {
            return Err(DatasetError::EmptyDomain(format!(
                "no grid points strictly inside lon ({}, {}) lat ({}, {})",
                bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y
            )));
        }

        let (nt, _, nlon) = self.coords.shape();
        let cells = self.coords.cells_per_slice();

        let variables = self
            .variables
            .iter()
            .map(|variable| {
                let mut data = Vec::with_capacity(nt * lat_idx.len() * lon_idx.len());
                for t in 0..nt {
                    let slice = variable.time_slice(t, cells);
                    for &y in &lat_idx {
                        let row = &slice[y * nlon..(y + 1) * nlon];
                        data.extend(lon_idx.iter().map(|&x| row[x]));
                    }
                }
                DataVariable {
                    name: variable.name.clone(),
                    missing_value: variable.missing_value,
                    data,
                }
            })
            .collect();

        let coords = Coordinates::new(
            self.coords.times.clone(),
            lat_idx.iter().map(|&i| self.coords.latitudes[i]).collect(),
            lon_idx.iter().map(|&i| self.coords.longitudes[i]).collect(),
        );

        debug!(
            from = ?self.coords.shape(),
            to = ?coords.shape(),
            "Cropped dataset to bounding box"
        );

        Ok(Self { coords, variables })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coords() -> Coordinates {
        Coordinates::new(
            vec![Utc.with_ymd_and_hms(2022, 11, 30, 0, 0, 0).unwrap()],
            vec![40.0, 45.0],
            vec![235.0, 240.0, 245.0],
        )
    }

    #[test]
    fn test_variable_grid_shape_check() {
        assert!(VariableGrid::new("t", None, coords(), vec![0.0; 6]).is_ok());
        let err = VariableGrid::new("t", None, coords(), vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch { expected: 6, actual: 5, .. }));
    }

    #[test]
    fn test_merge_rejects_duplicates() {
        let a = VariableGrid::new("t", None, coords(), vec![0.0; 6]).unwrap();
        let b = VariableGrid::new("t", None, coords(), vec![1.0; 6]).unwrap();
        let err = GriddedDataset::merge(vec![a, b]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateVariable(_)));
    }

    #[test]
    fn test_merge_empty() {
        assert!(matches!(
            GriddedDataset::merge(Vec::new()),
            Err(DatasetError::NoVariables)
        ));
    }

    #[test]
    fn test_center_is_mean() {
        let (lat, lon) = coords().center().unwrap();
        assert!((lat - 42.5).abs() < 1e-12);
        assert!((lon - 240.0).abs() < 1e-12);
    }

    #[test]
    fn test_latitudes_descending() {
        let mut c = coords();
        assert!(!c.latitudes_descending());
        c.latitudes.reverse();
        assert!(c.latitudes_descending());
    }
}
