//! SARIMA (Seasonal Autoregressive Integrated Moving Average) model.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::sarima::diff::{
    difference, integrate, seasonal_difference, seasonal_integrate,
};
use crate::models::Forecaster;
use crate::utils::optimization::{minimize, SimplexOptions};
use crate::utils::stats::quantile_normal;

/// Coefficient box bound. Wide enough that near-unit-root candidates still
/// fit; stationarity and invertibility are not enforced.
const COEF_BOUND: f64 = 0.998;

/// Floor for the residual variance entering the log-likelihood, so exact
/// fits (e.g. a constant series) keep a finite criterion.
const VAR_FLOOR: f64 = 1e-12;

/// SARIMA model specification: order (p, d, q) and seasonal order
/// (P, D, Q)\[s\].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaSpec {
    /// Non-seasonal AR order (p).
    pub p: usize,
    /// Non-seasonal differencing order (d).
    pub d: usize,
    /// Non-seasonal MA order (q).
    pub q: usize,
    /// Seasonal AR order (P).
    pub cap_p: usize,
    /// Seasonal differencing order (D).
    pub cap_d: usize,
    /// Seasonal MA order (Q).
    pub cap_q: usize,
    /// Seasonal period (s).
    pub s: usize,
}

impl SarimaSpec {
    /// Create a full seasonal specification.
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self {
            p,
            d,
            q,
            cap_p,
            cap_d,
            cap_q,
            s,
        }
    }

    /// Create a non-seasonal ARIMA(p, d, q) specification.
    pub fn arima(p: usize, d: usize, q: usize) -> Self {
        Self::new(p, d, q, 0, 0, 0, 0)
    }

    /// Total number of estimated parameters, intercept included.
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.cap_p + self.cap_q + 1
    }

    /// Whether any seasonal term is present.
    pub fn has_seasonal_terms(&self) -> bool {
        self.cap_p > 0 || self.cap_d > 0 || self.cap_q > 0
    }

    /// Observations consumed before the first conditional residual.
    fn warmup(&self) -> usize {
        (self.p + self.cap_p * self.s).max(self.q + self.cap_q * self.s)
    }

    /// Minimum series length for a fit to be attemptable.
    fn min_observations(&self) -> usize {
        self.d + self.cap_d * self.s + self.warmup() + 2
    }
}

/// Estimated coefficients of a fitted SARIMA model.
#[derive(Debug, Clone, Default)]
struct Coefficients {
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
}

impl Coefficients {
    /// Unpack the flat optimizer vector
    /// `[intercept, ar.., ma.., seasonal_ar.., seasonal_ma..]`.
    fn from_flat(params: &[f64], spec: &SarimaSpec) -> Self {
        let mut at = 1;
        let mut take = |count: usize| {
            let slice = params[at..at + count].to_vec();
            at += count;
            slice
        };
        Self {
            intercept: params[0],
            ar: take(spec.p),
            ma: take(spec.q),
            seasonal_ar: take(spec.cap_p),
            seasonal_ma: take(spec.cap_q),
        }
    }

    /// One-step prediction of `z[t]` given history `z[..t]` and residuals
    /// `e[..t]`, using the multiplicative seasonal polynomials.
    fn one_step(&self, t: usize, z: &[f64], e: &[f64], s: usize) -> f64 {
        let c = self.intercept;
        let mut pred = c;

        // AR side: (1 - φB)(1 - ΦB^s)
        for (i, &phi) in self.ar.iter().enumerate() {
            pred += phi * (z[t - 1 - i] - c);
        }
        for (j, &sphi) in self.seasonal_ar.iter().enumerate() {
            pred += sphi * (z[t - (j + 1) * s] - c);
        }
        for (i, &phi) in self.ar.iter().enumerate() {
            for (j, &sphi) in self.seasonal_ar.iter().enumerate() {
                pred -= phi * sphi * (z[t - 1 - i - (j + 1) * s] - c);
            }
        }

        // MA side: (1 + θB)(1 + ΘB^s)
        for (i, &theta) in self.ma.iter().enumerate() {
            pred += theta * e[t - 1 - i];
        }
        for (j, &stheta) in self.seasonal_ma.iter().enumerate() {
            pred += stheta * e[t - (j + 1) * s];
        }
        for (i, &theta) in self.ma.iter().enumerate() {
            for (j, &stheta) in self.seasonal_ma.iter().enumerate() {
                pred += theta * stheta * e[t - 1 - i - (j + 1) * s];
            }
        }

        pred
    }
}

/// Seasonal ARIMA forecasting model.
///
/// Fit pipeline: seasonal differencing D times at lag s, regular
/// differencing d times, then conditional-sum-of-squares estimation of
/// the AR/MA coefficients and intercept. Coefficients are box-bounded
/// rather than constrained to stationary/invertible regions, so
/// borderline specifications still produce a fit where numerically
/// possible.
#[derive(Debug, Clone)]
pub struct SARIMA {
    spec: SarimaSpec,
    coef: Coefficients,
    /// Original series, for integration.
    original: Option<Vec<f64>>,
    /// Series after seasonal differencing only.
    seasonal_adjusted: Option<Vec<f64>>,
    /// Fully differenced working series.
    working: Option<Vec<f64>>,
    /// Fitted values on the working scale (NaN during warmup).
    fitted: Option<Vec<f64>>,
    /// Residuals on the working scale.
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
}

impl SARIMA {
    /// Create a SARIMA(p, d, q)(P, D, Q)\[s\] model.
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self::from_spec(SarimaSpec::new(p, d, q, cap_p, cap_d, cap_q, s))
    }

    /// Create a non-seasonal ARIMA(p, d, q) model.
    pub fn arima(p: usize, d: usize, q: usize) -> Self {
        Self::from_spec(SarimaSpec::arima(p, d, q))
    }

    /// Create a model from a full specification.
    pub fn from_spec(spec: SarimaSpec) -> Self {
        Self {
            spec,
            coef: Coefficients::default(),
            original: None,
            seasonal_adjusted: None,
            working: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
        }
    }

    /// Model specification.
    pub fn spec(&self) -> SarimaSpec {
        self.spec
    }

    /// Non-seasonal AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.coef.ar
    }

    /// Non-seasonal MA coefficients.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.coef.ma
    }

    /// Seasonal AR coefficients.
    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.coef.seasonal_ar
    }

    /// Seasonal MA coefficients.
    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.coef.seasonal_ma
    }

    /// Intercept on the differenced scale.
    pub fn intercept(&self) -> f64 {
        self.coef.intercept
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion of the fit.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Conditional sum of squares of `coef` over the working series.
    fn css(coef: &Coefficients, working: &[f64], warmup: usize, s: usize) -> f64 {
        let n = working.len();
        let mut residuals = vec![0.0; n];
        let mut total = 0.0;

        for t in warmup..n {
            let pred = coef.one_step(t, working, &residuals, s);
            let error = working[t] - pred;
            residuals[t] = error;
            total += error * error;
        }

        if total.is_finite() {
            total
        } else {
            f64::MAX
        }
    }

    /// Estimate coefficients on the working series.
    fn estimate(&mut self, working: &[f64]) {
        let spec = self.spec;
        let mean = working.iter().sum::<f64>() / working.len() as f64;

        if spec.num_params() == 1 {
            // Intercept only: the conditional least squares solution is
            // the mean of the working series.
            self.coef = Coefficients {
                intercept: mean,
                ..Default::default()
            };
            return;
        }

        let n_coef = spec.num_params() - 1;
        let mut start = Vec::with_capacity(spec.num_params());
        start.push(mean);
        for block in [spec.p, spec.q, spec.cap_p, spec.cap_q] {
            for i in 0..block {
                start.push(0.1 / (i + 1) as f64);
            }
        }

        let mut bounds = Vec::with_capacity(spec.num_params());
        bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        bounds.extend(std::iter::repeat((-COEF_BOUND, COEF_BOUND)).take(n_coef));

        let warmup = spec.warmup();
        let options = SimplexOptions {
            max_iterations: 1000,
            tolerance: 1e-8,
            ..Default::default()
        };
        let result = minimize(
            |params| {
                let candidate = Coefficients::from_flat(params, &spec);
                Self::css(&candidate, working, warmup, spec.s)
            },
            &start,
            Some(&bounds),
            options,
        );

        self.coef = Coefficients::from_flat(&result.point, &spec);
    }

    /// Compute fitted values, residuals and information criteria on the
    /// working scale.
    fn summarize(&mut self, working: &[f64]) -> Result<()> {
        let n = working.len();
        let warmup = self.spec.warmup();
        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];

        for t in warmup..n {
            let pred = self.coef.one_step(t, working, &residuals, self.spec.s);
            fitted[t] = pred;
            residuals[t] = working[t] - pred;
        }

        let n_eff = n - warmup;
        let variance =
            residuals[warmup..].iter().map(|e| e * e).sum::<f64>() / n_eff as f64;
        if !variance.is_finite() {
            return Err(ForecastError::Numerical(
                "residual variance is not finite".to_string(),
            ));
        }

        let k = self.spec.num_params() as f64;
        let n_eff = n_eff as f64;
        let log_likelihood = -0.5
            * n_eff
            * (1.0 + variance.max(VAR_FLOOR).ln() + (2.0 * std::f64::consts::PI).ln());

        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.residual_variance = Some(variance);
        self.aic = Some(-2.0 * log_likelihood + 2.0 * k);
        self.bic = Some(-2.0 * log_likelihood + k * n_eff.ln());
        Ok(())
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let spec = self.spec;
        if spec.has_seasonal_terms() && spec.s < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal terms require a period of at least 2, got {}",
                spec.s
            )));
        }

        let values = series.values();
        let needed = spec.min_observations();
        if values.len() < needed {
            return Err(ForecastError::InsufficientObservations {
                needed,
                got: values.len(),
            });
        }

        let seasonal_adjusted = seasonal_difference(values, spec.cap_d, spec.s);
        let working = difference(&seasonal_adjusted, spec.d);
        if working.len() < spec.warmup() + 2 {
            return Err(ForecastError::InsufficientObservations {
                needed,
                got: values.len(),
            });
        }

        self.estimate(&working);
        self.summarize(&working)?;

        self.original = Some(values.to_vec());
        self.seasonal_adjusted = Some(seasonal_adjusted);
        self.working = Some(working);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(ForecastError::NotFitted)?;
        let seasonal_adjusted = self
            .seasonal_adjusted
            .as_ref()
            .ok_or(ForecastError::NotFitted)?;
        let working = self.working.as_ref().ok_or(ForecastError::NotFitted)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::NotFitted)?;

        if horizon == 0 {
            return Ok(Forecast::from_point(vec![]));
        }

        // Recurse on the working scale; future shocks are zero.
        let mut z = working.clone();
        let mut e = residuals.clone();
        for _ in 0..horizon {
            let t = z.len();
            let pred = self.coef.one_step(t, &z, &e, self.spec.s);
            z.push(pred);
            e.push(0.0);
        }
        let forecast_working = z[working.len()..].to_vec();

        // Integrate back: regular differencing first, then seasonal.
        let forecast_seasonal = integrate(&forecast_working, seasonal_adjusted, self.spec.d);
        let point = seasonal_integrate(
            &forecast_seasonal,
            original,
            self.spec.cap_d,
            self.spec.s,
        );

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

        // Forecast variance approximated as linear growth in horizon.
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
        if self.spec.has_seasonal_terms() {
            "SARIMA"
        } else {
            "ARIMA"
        }
    }
}
