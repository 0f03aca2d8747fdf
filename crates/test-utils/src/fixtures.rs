//! Common test fixtures for climate dashboard tests.
//!
//! This module provides pre-defined values that mirror the CFS forecast
//! files the dashboard is built from.

/// Bounding boxes as `(min_lon, min_lat, max_lon, max_lat)`, 0..360 longitudes.
pub mod bbox {
    /// The dashboard's default crop region
    pub const PACIFIC_NORTHWEST: (f64, f64, f64, f64) = (230.0, 35.0, 250.0, 50.0);

    /// Misses the synthetic grid entirely
    pub const ATLANTIC: (f64, f64, f64, f64) = (300.0, 10.0, 340.0, 30.0);
}

/// Synthetic grid layout, shaped like a small slice of the CFS 1-degree grid.
pub mod grid {
    /// Latitudes run north to south, as in the CFS files.
    pub const LAT_START: f64 = 55.0;
    pub const LAT_STEP: f64 = -1.0;
    pub const LAT_COUNT: usize = 26;

    pub const LON_START: f64 = 225.0;
    pub const LON_STEP: f64 = 1.0;
    pub const LON_COUNT: usize = 31;

    /// Cropping to the default box keeps lat 49..36 and lon 231..249.
    pub const CROPPED_SHAPE: (usize, usize) = (14, 19);
}

/// Variables, files and markers of the four forecast files.
pub mod variables {
    pub const NAMES: [&str; 4] = ["prate", "sde", "t", "watr"];

    pub const FILES: [&str; 4] = [
        "cfs_prate_20221130.nc",
        "cfs_sde_20221130.nc",
        "cfs_t_20221130.nc",
        "cfs_watr_20221130.nc",
    ];

    /// `GRIB_missingValue` written by cfgrib
    pub const MISSING_VALUE: f32 = 9.999e20;
}

/// Forecast time axis.
pub mod time {
    pub const REFERENCE_TIME: &str = "2022-11-30T00:00:00Z";

    /// CFS 6-hourly output
    pub const STEP_HOURS: i64 = 6;

    /// Timestamps inside each forecast span at 6-hourly output.
    pub const STEPS_PER_DAY: usize = 4;
    pub const STEPS_PER_WEEK: usize = 28;
    pub const STEPS_PER_MONTH: usize = 120;
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_output_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("figures")
        .tempdir()
        .expect("Failed to create temporary test directory")
}
