//! Autoregression model with a fixed lag order.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::ols::least_squares;
use crate::utils::stats::quantile_normal;

/// AR(k) forecasting model.
///
/// Regresses each observation on its `lags` predecessors plus an
/// intercept, estimated by ordinary least squares on the lagged design
/// matrix. Forecasts recurse on previous predictions.
#[derive(Debug, Clone)]
pub struct Autoregression {
    lags: usize,
    coefficients: Vec<f64>,
    intercept: f64,
    history: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
}

impl Autoregression {
    /// Create an AR model with the given lag order.
    pub fn new(lags: usize) -> Self {
        Self {
            lags,
            coefficients: vec![],
            intercept: 0.0,
            history: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
        }
    }

    /// Lag order.
    pub fn lags(&self) -> usize {
        self.lags
    }

    /// Estimated lag coefficients, most recent lag first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Estimated intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion of the fit.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }
}

impl Forecaster for Autoregression {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if self.lags == 0 {
            return Err(ForecastError::InvalidParameter(
                "lag order must be at least 1".to_string(),
            ));
        }

        let values = series.values();
        let n = values.len();
        // Need strictly more design rows than parameters.
        let needed = 2 * self.lags + 2;
        if n < needed {
            return Err(ForecastError::InsufficientObservations { needed, got: n });
        }

        // Row t predicts values[t] from values[t-1], ..., values[t-lags].
        let rows = n - self.lags;
        let target: Vec<f64> = values[self.lags..].to_vec();
        let columns: Vec<Vec<f64>> = (1..=self.lags)
            .map(|lag| {
                (0..rows)
                    .map(|row| values[row + self.lags - lag])
                    .collect()
            })
            .collect();
        let column_refs: Vec<&[f64]> = columns.iter().map(|c| c.as_slice()).collect();

        let fit = least_squares(&target, &column_refs)?;

        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];
        for (row, &e) in fit.residuals.iter().enumerate() {
            let t = row + self.lags;
            fitted[t] = target[row] - e;
            residuals[t] = e;
        }

        let n_eff = rows as f64;
        let variance = fit.rss / n_eff;
        let k = (self.lags + 1) as f64;
        let log_likelihood =
            -0.5 * n_eff * (1.0 + variance.max(1e-12).ln() + (2.0 * std::f64::consts::PI).ln());

        self.coefficients = fit.coefficients;
        self.intercept = fit.intercept;
        self.history = Some(values.to_vec());
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.residual_variance = Some(variance);
        self.aic = Some(-2.0 * log_likelihood + 2.0 * k);
        self.bic = Some(-2.0 * log_likelihood + k * n_eff.ln());
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let history = self.history.as_ref().ok_or(ForecastError::NotFitted)?;

        let mut extended = history.clone();
        let mut point = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.intercept;
            for (lag, &coef) in self.coefficients.iter().enumerate() {
                pred += coef * extended[t - 1 - lag];
            }
            extended.push(pred);
            point.push(pred);
        }

        Ok(Forecast::from_point(point))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let variance = self.residual_variance.ok_or(ForecastError::NotFitted)?;
        let z = quantile_normal((1.0 + level) / 2.0);
        let point = forecast.point().to_vec();

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &value) in point.iter().enumerate() {
            let se = (variance * (h + 1) as f64).sqrt();
            lower.push(value - z * se);
            upper.push(value + z * se);
        }

        Forecast::with_intervals(point, lower, upper)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "Autoregression"
    }
}
