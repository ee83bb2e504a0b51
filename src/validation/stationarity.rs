//! Augmented Dickey-Fuller test for a unit root.
//!
//! The null hypothesis is that the series has a unit root
//! (non-stationary); rejection implies stationarity. Differencing
//! decisions ahead of ARIMA modelling are usually made off this test.

use crate::utils::ols::solve_symmetric;

/// Critical values of the Dickey-Fuller distribution with constant
/// (MacKinnon approximation).
#[derive(Debug, Clone, Copy)]
pub struct CriticalValues {
    /// 1% significance.
    pub one_pct: f64,
    /// 5% significance.
    pub five_pct: f64,
    /// 10% significance.
    pub ten_pct: f64,
}

impl Default for CriticalValues {
    fn default() -> Self {
        Self {
            one_pct: -3.43,
            five_pct: -2.86,
            ten_pct: -2.57,
        }
    }
}

/// Outcome of an ADF test.
#[derive(Debug, Clone)]
pub struct AdfReport {
    /// The Dickey-Fuller t-statistic.
    pub statistic: f64,
    /// Approximate p-value.
    pub p_value: f64,
    /// Augmentation lags used.
    pub lags: usize,
    /// Whether the unit root is rejected at 5%.
    pub is_stationary: bool,
    /// Critical values for reference.
    pub critical_values: CriticalValues,
}

impl AdfReport {
    fn degenerate() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            is_stationary: false,
            critical_values: CriticalValues::default(),
        }
    }
}

/// Run the ADF regression
/// `Δy_t = α + β·y_{t-1} + Σ γ_i·Δy_{t-i} + ε_t`
/// and report the t-statistic on `β`.
///
/// The augmentation lag is chosen by AIC up to `max_lags`
/// (default `(n-1)^(1/3)`). Series too short or too degenerate for the
/// regression produce a NaN report.
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> AdfReport {
    let n = series.len();
    if n < 6 {
        return AdfReport::degenerate();
    }

    // diff[i] = y[i+1] - y[i]
    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let default_lags = ((n - 1) as f64).powf(1.0 / 3.0).floor() as usize;
    let upper = (n.saturating_sub(4)) / 2;
    let max_lags = max_lags.unwrap_or(default_lags).clamp(1, upper.max(1));

    // Pick the augmentation lag by AIC over the candidate regressions.
    let mut best: Option<(usize, f64, AdfFit)> = None;
    for lag in 1..=max_lags {
        let Some(fit) = fit_adf(series, &diff, lag) else {
            continue;
        };
        let rows = fit.rows as f64;
        let k = (lag + 2) as f64;
        if fit.rss <= 0.0 {
            continue;
        }
        let aic = rows * (fit.rss / rows).ln() + 2.0 * k;
        if best.as_ref().map_or(true, |(_, best_aic, _)| aic < *best_aic) {
            best = Some((lag, aic, fit));
        }
    }

    let Some((lags, _, fit)) = best else {
        return AdfReport::degenerate();
    };

    if fit.se <= 0.0 || !fit.se.is_finite() {
        return AdfReport::degenerate();
    }

    let statistic = fit.beta / fit.se;
    let critical_values = CriticalValues::default();

    AdfReport {
        statistic,
        p_value: approximate_p_value(statistic),
        lags,
        is_stationary: statistic < critical_values.five_pct,
        critical_values,
    }
}

/// Level coefficient, its standard error, and the fit diagnostics of one
/// ADF regression.
struct AdfFit {
    beta: f64,
    se: f64,
    rss: f64,
    rows: usize,
}

/// Solve the ADF regression for a given augmentation lag.
///
/// Design columns: `[1, y_{t-1}, Δy_{t-1}, ..., Δy_{t-lag}]`.
fn fit_adf(series: &[f64], diff: &[f64], lag: usize) -> Option<AdfFit> {
    let m = diff.len();
    if m <= lag {
        return None;
    }
    let rows = m - lag;
    let k = lag + 2;
    if rows <= k {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    let mut row = vec![0.0; k];

    for i in lag..m {
        row[0] = 1.0;
        row[1] = series[i];
        for j in 1..=lag {
            row[j + 1] = diff[i - j];
        }

        let y = diff[i];
        for a in 0..k {
            xty[a] += row[a] * y;
            for b in a..k {
                xtx[a][b] += row[a] * row[b];
            }
        }
    }
    for a in 0..k {
        for b in 0..a {
            xtx[a][b] = xtx[b][a];
        }
    }

    let beta = solve_symmetric(&xtx, &xty)?;

    let mut rss = 0.0;
    for i in lag..m {
        let mut fitted = beta[0] + beta[1] * series[i];
        for j in 1..=lag {
            fitted += beta[j + 1] * diff[i - j];
        }
        let e = diff[i] - fitted;
        rss += e * e;
    }

    let sigma_sq = rss / (rows - k) as f64;
    if sigma_sq <= 0.0 || !sigma_sq.is_finite() {
        return None;
    }

    // Var(β) = σ² · [(X'X)⁻¹]_{11}, via one more solve against e_1.
    let mut unit = vec![0.0; k];
    unit[1] = 1.0;
    let column = solve_symmetric(&xtx, &unit)?;
    if column[1] <= 0.0 {
        return None;
    }

    Some(AdfFit {
        beta: beta[1],
        se: (sigma_sq * column[1]).sqrt(),
        rss,
        rows,
    })
}

/// Piecewise-linear interpolation over MacKinnon-style anchor points for
/// the constant-only Dickey-Fuller distribution.
fn approximate_p_value(statistic: f64) -> f64 {
    const ANCHORS: [(f64, f64); 10] = [
        (-4.0, 0.001),
        (-3.43, 0.01),
        (-2.86, 0.05),
        (-2.57, 0.10),
        (-1.94, 0.20),
        (-1.62, 0.30),
        (-1.28, 0.40),
        (-0.84, 0.50),
        (0.0, 0.70),
        (1.0, 0.95),
    ];

    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic <= ANCHORS[0].0 {
        return ANCHORS[0].1;
    }
    if statistic >= ANCHORS[ANCHORS.len() - 1].0 {
        return ANCHORS[ANCHORS.len() - 1].1;
    }

    for pair in ANCHORS.windows(2) {
        let (x0, p0) = pair[0];
        let (x1, p1) = pair[1];
        if statistic <= x1 {
            let w = (statistic - x0) / (x1 - x0);
            return p0 + w * (p1 - p0);
        }
    }
    ANCHORS[ANCHORS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic noise in [-0.5, 0.5), white enough for these tests.
    fn pseudo_noise(i: usize) -> f64 {
        let x = (i as f64 * 12.9898).sin() * 43758.5453;
        (x - x.floor()) - 0.5
    }

    #[test]
    fn mean_reverting_series_is_stationary() {
        // AR(1) with coefficient 0.3: the level term in the ADF
        // regression sits far below zero.
        let mut values = vec![0.0];
        for i in 1..200 {
            values.push(0.3 * values[i - 1] + pseudo_noise(i));
        }

        let report = adf_test(&values, None);
        assert!(report.statistic < report.critical_values.five_pct);
        assert!(report.is_stationary);
        assert!(report.p_value < 0.05);
    }

    #[test]
    fn trending_series_is_not_stationary() {
        let values: Vec<f64> = (0..200)
            .map(|i| 0.5 * i as f64 + pseudo_noise(i))
            .collect();

        let report = adf_test(&values, None);
        assert!(!report.is_stationary);
        assert!(report.p_value > 0.05);
    }

    #[test]
    fn short_series_reports_nan() {
        let report = adf_test(&[1.0, 2.0, 3.0], None);
        assert!(report.statistic.is_nan());
        assert!(!report.is_stationary);
        assert_eq!(report.lags, 0);
    }

    #[test]
    fn respects_max_lags() {
        let values: Vec<f64> = (0..100).map(|i| (i as f64 * 0.5).sin()).collect();
        let report = adf_test(&values, Some(2));
        assert!(report.lags >= 1 && report.lags <= 2);
    }

    #[test]
    fn p_value_interpolation_is_monotone() {
        let mut previous = 0.0;
        for step in 0..60 {
            let stat = -5.0 + step as f64 * 0.125;
            let p = approximate_p_value(stat);
            assert!(p >= previous);
            previous = p;
        }
    }

    #[test]
    fn p_value_hits_anchor_points() {
        assert!((approximate_p_value(-2.86) - 0.05).abs() < 1e-12);
        assert!((approximate_p_value(-3.43) - 0.01).abs() < 1e-12);
        assert_eq!(approximate_p_value(-10.0), 0.001);
        assert_eq!(approximate_p_value(3.0), 0.95);
    }
}
