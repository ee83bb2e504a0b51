//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for all forecasting models.
///
/// Object-safe, so heterogeneous model sets can be compared through
/// `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Forecast the specified number of steps past the end of the
    /// training data.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Forecast with prediction intervals at the given two-sided level
    /// (e.g. 0.95).
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step-ahead predictions, where defined.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// In-sample residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name for reporting.
    fn name(&self) -> &str;

    /// Whether the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}
