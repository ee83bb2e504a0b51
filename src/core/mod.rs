//! Core data structures for univariate time series forecasting.

mod forecast;
mod time_series;

pub use forecast::Forecast;
pub use time_series::TimeSeries;
