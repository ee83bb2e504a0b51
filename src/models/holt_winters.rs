//! Holt-Winters triple exponential smoothing.
//!
//! Additive trend with additive or multiplicative seasonality. Smoothing
//! weights are either supplied or estimated by minimizing in-sample SSE.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{minimize, SimplexOptions};
use crate::utils::stats::quantile_normal;

/// Smoothing weights live strictly inside the unit interval.
const WEIGHT_BOUNDS: (f64, f64) = (0.0001, 0.9999);

/// How the seasonal component combines with level and trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonalComponent {
    /// `y = level + trend + seasonal`
    #[default]
    Additive,
    /// `y = (level + trend) * seasonal`
    Multiplicative,
}

/// End state and diagnostics of one smoothing pass over the data.
#[derive(Debug, Clone)]
struct SmoothingPass {
    sse: f64,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

/// Holt-Winters forecasting model.
///
/// Recursions for additive seasonality:
/// - level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
///
/// Multiplicative seasonality replaces the subtractions of `s` with
/// divisions.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    period: usize,
    component: SeasonalComponent,
    estimate: bool,
    level: Option<f64>,
    trend: Option<f64>,
    seasonals: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    n: usize,
}

impl HoltWinters {
    /// Create a model with fixed smoothing weights.
    pub fn fixed(
        alpha: f64,
        beta: f64,
        gamma: f64,
        period: usize,
        component: SeasonalComponent,
    ) -> Self {
        let clamp = |w: f64| w.clamp(WEIGHT_BOUNDS.0, WEIGHT_BOUNDS.1);
        Self {
            alpha: Some(clamp(alpha)),
            beta: Some(clamp(beta)),
            gamma: Some(clamp(gamma)),
            period,
            component,
            estimate: false,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            n: 0,
        }
    }

    /// Create a model whose weights are estimated at fit time.
    pub fn estimated(period: usize, component: SeasonalComponent) -> Self {
        Self {
            alpha: None,
            beta: None,
            gamma: None,
            period,
            component,
            estimate: true,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            n: 0,
        }
    }

    /// Level smoothing weight.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Trend smoothing weight.
    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    /// Seasonal smoothing weight.
    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }

    /// Seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Seasonal component type.
    pub fn component(&self) -> SeasonalComponent {
        self.component
    }

    /// Final seasonal indices after fitting.
    pub fn seasonals(&self) -> Option<&[f64]> {
        self.seasonals.as_deref()
    }

    /// Starting level, trend and seasonal indices from the first cycles.
    fn initial_state(values: &[f64], period: usize, component: SeasonalComponent) -> (f64, f64, Vec<f64>) {
        let first_cycle = &values[..period];
        let level = first_cycle.iter().sum::<f64>() / period as f64;

        // Average per-step change between the first two cycles.
        let trend = if values.len() >= 2 * period {
            (0..period)
                .map(|i| (values[period + i] - values[i]) / period as f64)
                .sum::<f64>()
                / period as f64
        } else {
            0.0
        };

        let mut seasonals: Vec<f64> = match component {
            SeasonalComponent::Additive => first_cycle.iter().map(|y| y - level).collect(),
            SeasonalComponent::Multiplicative => first_cycle
                .iter()
                .map(|y| if level.abs() > 1e-10 { y / level } else { 1.0 })
                .collect(),
        };
        Self::normalize(&mut seasonals, component);

        (level, trend, seasonals)
    }

    /// Keep seasonal indices identified: additive indices sum to zero,
    /// multiplicative indices average to one.
    fn normalize(seasonals: &mut [f64], component: SeasonalComponent) {
        let period = seasonals.len();
        if period == 0 {
            return;
        }
        match component {
            SeasonalComponent::Additive => {
                let shift = seasonals.iter().sum::<f64>() / period as f64;
                for s in seasonals.iter_mut() {
                    *s -= shift;
                }
            }
            SeasonalComponent::Multiplicative => {
                let scale = seasonals.iter().sum::<f64>() / period as f64;
                if scale.abs() > 1e-10 {
                    for s in seasonals.iter_mut() {
                        *s /= scale;
                    }
                }
            }
        }
    }

    /// Run the smoothing recursion once over the data.
    fn run_pass(
        values: &[f64],
        alpha: f64,
        beta: f64,
        gamma: f64,
        period: usize,
        component: SeasonalComponent,
    ) -> SmoothingPass {
        let (mut level, mut trend, mut seasonals) =
            Self::initial_state(values, period, component);

        let n = values.len();
        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];
        let mut sse = 0.0;

        for (t, &y) in values.iter().enumerate().skip(period) {
            let idx = t % period;
            let s = seasonals[idx];

            let prediction = match component {
                SeasonalComponent::Additive => level + trend + s,
                SeasonalComponent::Multiplicative => (level + trend) * s,
            };
            let error = y - prediction;
            fitted[t] = prediction;
            residuals[t] = error;
            sse += error * error;

            let previous_level = level;
            match component {
                SeasonalComponent::Additive => {
                    level = alpha * (y - s) + (1.0 - alpha) * (previous_level + trend);
                    trend = beta * (level - previous_level) + (1.0 - beta) * trend;
                    seasonals[idx] = gamma * (y - level) + (1.0 - gamma) * s;
                }
                SeasonalComponent::Multiplicative => {
                    let deseasonalized = if s.abs() > 1e-10 { y / s } else { y };
                    level = alpha * deseasonalized + (1.0 - alpha) * (previous_level + trend);
                    trend = beta * (level - previous_level) + (1.0 - beta) * trend;
                    if level.abs() > 1e-10 {
                        seasonals[idx] = gamma * (y / level) + (1.0 - gamma) * s;
                    }
                }
            }
        }

        SmoothingPass {
            sse,
            level,
            trend,
            seasonals,
            fitted,
            residuals,
        }
    }

    /// Pick smoothing weights by minimizing in-sample SSE.
    fn estimate_weights(
        values: &[f64],
        period: usize,
        component: SeasonalComponent,
    ) -> (f64, f64, f64) {
        let options = SimplexOptions {
            max_iterations: 1000,
            tolerance: 1e-8,
            ..Default::default()
        };
        let result = minimize(
            |w| Self::run_pass(values, w[0], w[1], w[2], period, component).sse,
            &[0.3, 0.1, 0.1],
            Some(&[WEIGHT_BOUNDS, WEIGHT_BOUNDS, WEIGHT_BOUNDS]),
            options,
        );

        let clamp = |w: f64| w.clamp(WEIGHT_BOUNDS.0, WEIGHT_BOUNDS.1);
        (
            clamp(result.point[0]),
            clamp(result.point[1]),
            clamp(result.point[2]),
        )
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if self.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.period
            )));
        }

        let values = series.values();
        let needed = 2 * self.period;
        if values.len() < needed {
            return Err(ForecastError::InsufficientObservations {
                needed,
                got: values.len(),
            });
        }

        if self.estimate {
            let (alpha, beta, gamma) =
                Self::estimate_weights(values, self.period, self.component);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
            self.gamma = Some(gamma);
        }

        // Weights are present: either fixed at construction or estimated above.
        let (alpha, beta, gamma) = match (self.alpha, self.beta, self.gamma) {
            (Some(a), Some(b), Some(g)) => (a, b, g),
            _ => {
                return Err(ForecastError::InvalidParameter(
                    "smoothing weights are not set".to_string(),
                ))
            }
        };

        let pass = Self::run_pass(values, alpha, beta, gamma, self.period, self.component);

        let n_eff = (values.len() - self.period) as f64;
        let variance = pass.sse / n_eff;
        if !variance.is_finite() {
            return Err(ForecastError::Numerical(
                "smoothing recursion diverged".to_string(),
            ));
        }

        self.level = Some(pass.level);
        self.trend = Some(pass.trend);
        self.seasonals = Some(pass.seasonals);
        self.fitted = Some(pass.fitted);
        self.residuals = Some(pass.residuals);
        self.residual_variance = Some(variance);
        self.n = values.len();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let level = self.level.ok_or(ForecastError::NotFitted)?;
        let trend = self.trend.ok_or(ForecastError::NotFitted)?;
        let seasonals = self.seasonals.as_ref().ok_or(ForecastError::NotFitted)?;

        let mut point = Vec::with_capacity(horizon);
        for step in 1..=horizon {
            let idx = (self.n + step - 1) % self.period;
            let base = level + step as f64 * trend;
            let value = match self.component {
                SeasonalComponent::Additive => base + seasonals[idx],
                SeasonalComponent::Multiplicative => base * seasonals[idx],
            };
            point.push(value);
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
        "HoltWinters"
    }
}
