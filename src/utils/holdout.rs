//! Expanding-window holdout evaluation.
//!
//! Trains a model on the head of a series and scores its forecast against
//! the held-out tail. This is the out-of-sample check used to compare
//! model families on the same series.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::metrics::{accuracy, AccuracyMetrics};

/// Configuration for a holdout evaluation.
#[derive(Debug, Clone)]
pub struct HoldoutConfig {
    /// Number of trailing observations withheld from training.
    pub horizon: usize,
    /// Minimum training length required before evaluating.
    pub min_train: usize,
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            horizon: 1,
            min_train: 10,
        }
    }
}

impl HoldoutConfig {
    /// Withhold the last `horizon` observations.
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            ..Default::default()
        }
    }

    /// Require at least `min_train` training observations.
    pub fn with_min_train(mut self, min_train: usize) -> Self {
        self.min_train = min_train;
        self
    }
}

/// Result of a holdout evaluation.
#[derive(Debug, Clone)]
pub struct HoldoutReport {
    /// Training observations used.
    pub train_len: usize,
    /// Held-out actual values.
    pub actual: Vec<f64>,
    /// Forecast values over the holdout window.
    pub predicted: Vec<f64>,
    /// Accuracy of the forecast against the holdout.
    pub metrics: AccuracyMetrics,
}

/// Fit a fresh model from `factory` on all but the last `config.horizon`
/// observations and score its forecast against them.
pub fn evaluate_holdout<M, F>(
    config: &HoldoutConfig,
    series: &TimeSeries,
    factory: F,
) -> Result<HoldoutReport>
where
    M: Forecaster,
    F: Fn() -> M,
{
    if config.horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "holdout horizon must be positive".to_string(),
        ));
    }

    let n = series.len();
    let needed = config.min_train + config.horizon;
    if n < needed {
        return Err(ForecastError::InsufficientObservations { needed, got: n });
    }

    let cut = n - config.horizon;
    let (train, test) = series.split_at(cut)?;

    let mut model = factory();
    model.fit(&train)?;
    let forecast = model.predict(config.horizon)?;

    let actual = test.values().to_vec();
    let predicted = forecast.point().to_vec();
    let metrics = accuracy(&actual, &predicted)?;

    Ok(HoldoutReport {
        train_len: cut,
        actual,
        predicted,
        metrics,
    })
}
