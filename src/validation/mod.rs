//! Statistical validation for time series models.

pub mod stationarity;

pub use stationarity::{adf_test, AdfReport, CriticalValues};
