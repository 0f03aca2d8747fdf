//! NetCDF reader for gridded climate forecast output.
//!
//! Each CFS file holds one physical variable on a `(time, latitude, longitude)`
//! grid plus its coordinate variables. GRIB-derived files (as written by
//! cfgrib) declare their no-data sentinel in a `GRIB_missingValue` attribute
//! and carry forecast valid times in a `valid_time` coordinate with CF units.
//!
//! Reading goes through the native `netcdf` library, which requires
//! libnetcdf and libhdf5 on the host.

pub mod cf_time;
pub mod error;
pub mod native;

pub use cf_time::{CfTimeUnits, TimeUnit};
pub use error::{NetCdfError, NetCdfResult};
pub use native::{read_variable_grid, silence_hdf5_errors, write_variable_grid, GridReadOptions};
