//! Differencing and integration utilities for seasonal ARIMA models.

/// Difference a series `d` times at lag 1.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return vec![];
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Difference a series `d` times at lag `period`.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return vec![];
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Undo lag-1 differencing for forecast values.
///
/// `forecast` holds future values on the differenced scale; `history` is
/// the undifferenced series the differences were taken from.
pub fn integrate(forecast: &[f64], history: &[f64], d: usize) -> Vec<f64> {
    if d == 0 {
        return forecast.to_vec();
    }

    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        // Continue the cumulative sum from the tail of the level-d series.
        let base = difference(history, level);
        let mut cumulative = base.last().copied().unwrap_or(0.0);
        for value in &mut result {
            cumulative += *value;
            *value = cumulative;
        }
    }
    result
}

/// Undo lag-`period` differencing for forecast values.
///
/// Future values are reconstructed recursively: each integrated value is
/// the differenced forecast plus the value one season earlier, drawing on
/// observed history until the forecast extends past it.
pub fn seasonal_integrate(forecast: &[f64], history: &[f64], d: usize, period: usize) -> Vec<f64> {
    if d == 0 || period == 0 {
        return forecast.to_vec();
    }

    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        let mut extended = seasonal_difference(history, level, period);
        let mut integrated = Vec::with_capacity(result.len());
        for &w in &result {
            let t = extended.len();
            let prev_season = if t >= period { extended[t - period] } else { 0.0 };
            let value = w + prev_season;
            extended.push(value);
            integrated.push(value);
        }
        result = integrated;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_identity_at_order_zero() {
        let series = vec![1.0, 2.0, 3.0];
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn difference_first_order() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn difference_second_order_flattens_quadratic() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_exhausted_series_is_empty() {
        assert!(difference(&[5.0], 1).is_empty());
        assert!(difference(&[1.0, 2.0], 2).is_empty());
    }

    #[test]
    fn seasonal_difference_removes_stable_pattern() {
        let series = vec![
            100.0, 120.0, 80.0, 90.0, // year one
            110.0, 130.0, 90.0, 100.0, // year two
        ];
        assert_eq!(
            seasonal_difference(&series, 1, 4),
            vec![10.0, 10.0, 10.0, 10.0]
        );
    }

    #[test]
    fn seasonal_difference_too_short_is_empty() {
        assert!(seasonal_difference(&[1.0, 2.0, 3.0], 1, 4).is_empty());
    }

    #[test]
    fn integrate_continues_from_last_observation() {
        let history = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let integrated = integrate(&[6.0, 7.0], &history, 1);

        assert_relative_eq!(integrated[0], 30.0, epsilon = 1e-12);
        assert_relative_eq!(integrated[1], 37.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_round_trips_second_order() {
        let history = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        // Second differences of the quadratic are all 1; continuing them
        // must continue the quadratic: 21, 28.
        let integrated = integrate(&[1.0, 1.0], &history, 2);

        assert_relative_eq!(integrated[0], 21.0, epsilon = 1e-12);
        assert_relative_eq!(integrated[1], 28.0, epsilon = 1e-12);
    }

    #[test]
    fn seasonal_integrate_round_trips() {
        // Quarterly pattern plus 10 per year, two observed years.
        let history = vec![100.0, 120.0, 80.0, 90.0, 110.0, 130.0, 90.0, 100.0];
        // Seasonal differences are all 10; continuing them for one year
        // must continue the pattern.
        let integrated = seasonal_integrate(&[10.0, 10.0, 10.0, 10.0], &history, 1, 4);

        assert_eq!(integrated, vec![120.0, 140.0, 100.0, 110.0]);
    }

    #[test]
    fn seasonal_integrate_extends_past_history() {
        let history = vec![1.0, 2.0, 1.0, 2.0];
        // Forecast two seasons ahead with zero differences: the pattern
        // repeats, and the second forecast year draws on the first.
        let integrated = seasonal_integrate(&[0.0; 4], &history, 1, 2);
        assert_eq!(integrated, vec![1.0, 2.0, 1.0, 2.0]);
    }
}
