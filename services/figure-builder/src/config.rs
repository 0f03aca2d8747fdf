//! Figure builder configuration.
//!
//! Every setting has a built-in default that reproduces the dashboard's
//! standard run, so the binary works with no config file at all. A YAML file
//! may override any subset of fields, and the command line overrides both.

use dashboard_common::{BoundingBox, ForecastSpan};
use netcdf_parser::native::DEFAULT_MISSING_VALUE_ATTRS;
use netcdf_parser::GridReadOptions;
use renderer::{ColorScale, MapSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Directory holding the input NetCDF files
    pub data_dir: PathBuf,
    /// Directory the HTML documents are written to; must already exist
    pub output_dir: PathBuf,
    /// Crop region, open interval on both axes
    pub bbox: BoundingBox,
    pub span: ForecastSpan,
    /// Variables in rendering order
    pub variables: Vec<VariableConfig>,
    pub coordinates: CoordinateNames,
    /// Attributes checked, in order, for each variable's no-data marker
    pub missing_value_attrs: Vec<String>,
    pub chart: ChartSettings,
    pub map: MapSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub file: String,
    /// Axis label and legend caption
    pub display_name: String,
    pub color_scale: ColorScale,
    /// LUT entry of `color_scale` used for the chart's deviation band
    pub chart_color_index: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateNames {
    pub time: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            bbox: BoundingBox::pacific_northwest(),
            span: ForecastSpan::Day,
            variables: default_variables(),
            coordinates: CoordinateNames::default(),
            missing_value_attrs: DEFAULT_MISSING_VALUE_ATTRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            chart: ChartSettings::default(),
            map: MapSpec::default(),
        }
    }
}

impl Default for CoordinateNames {
    fn default() -> Self {
        Self {
            time: "valid_time".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
        }
    }
}

fn default_variables() -> Vec<VariableConfig> {
    let variable = |name: &str, display_name: &str, color_scale, chart_color_index| VariableConfig {
        name: name.to_string(),
        file: format!("cfs_{}_20221130.nc", name),
        display_name: display_name.to_string(),
        color_scale,
        chart_color_index,
    };
    vec![
        variable("prate", "Precipitation rate [kg m^-2 s^-1]", ColorScale::Blues, 150),
        variable("sde", "Snow depth [m]", ColorScale::Cool, 50),
        variable("t", "Air temperature [K]", ColorScale::Coolwarm, 150),
        variable("watr", "Water runoff [kg m^-2]", ColorScale::GnBu, 150),
    ]
}

// ============================================================================
// Loading and validation
// ============================================================================

impl FigureConfig {
    /// Load a YAML file; fields it leaves out keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variables.is_empty() {
            return Err(ConfigError::Invalid("variable list is empty".to_string()));
        }
        if !self.bbox.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "bounding box needs min < max on both axes, got lon ({}, {}) lat ({}, {})",
                self.bbox.min_x, self.bbox.max_x, self.bbox.min_y, self.bbox.max_y
            )));
        }

        let mut seen = HashSet::new();
        for variable in &self.variables {
            if variable.name.is_empty() || variable.file.is_empty() {
                return Err(ConfigError::Invalid(
                    "every variable needs a name and a file".to_string(),
                ));
            }
            if !seen.insert(variable.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "variable '{}' is listed twice",
                    variable.name
                )));
            }
            if variable.chart_color_index > u8::MAX as u16 {
                return Err(ConfigError::Invalid(format!(
                    "chart_color_index for '{}' is {}, must be 0..=255",
                    variable.name, variable.chart_color_index
                )));
            }
        }

        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ConfigError::Invalid("chart size must be non-zero".to_string()));
        }
        if self.map.width == 0 || self.map.height == 0 {
            return Err(ConfigError::Invalid("map size must be non-zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.map.opacity) {
            return Err(ConfigError::Invalid(format!(
                "map opacity {} is outside [0, 1]",
                self.map.opacity
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(span) = overrides.span {
            self.span = span;
        }
        if let Some(bbox) = overrides.bbox {
            self.bbox = bbox;
        }
    }

    /// Reader options for one configured variable.
    pub fn read_options(&self, variable: &VariableConfig) -> GridReadOptions {
        GridReadOptions {
            variable: variable.name.clone(),
            time_coord: self.coordinates.time.clone(),
            lat_coord: self.coordinates.latitude.clone(),
            lon_coord: self.coordinates.longitude.clone(),
            missing_value_attrs: self.missing_value_attrs.clone(),
        }
    }

    pub fn input_path(&self, variable: &VariableConfig) -> PathBuf {
        self.data_dir.join(&variable.file)
    }
}

impl VariableConfig {
    /// Band colour for this variable's chart.
    pub fn chart_color(&self) -> renderer::Color {
        let index = u8::try_from(self.chart_color_index).unwrap_or(u8::MAX);
        self.color_scale.color_at_index(index)
    }
}

/// Values taken from the command line or environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub span: Option<ForecastSpan>,
    pub bbox: Option<BoundingBox>,
}
