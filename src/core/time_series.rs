//! TimeSeries data structure for representing temporal data.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// An ordered univariate time series: one value per timestamp, strictly
/// increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a time series from parallel timestamp and value vectors.
    ///
    /// Timestamps must be strictly increasing and align one-to-one with
    /// values.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::LengthMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::UnorderedTimestamps);
        }

        Ok(Self { timestamps, values })
    }

    /// Create a regularly spaced series starting at `origin` with the given
    /// step between observations.
    pub fn regular(origin: DateTime<Utc>, step: Duration, values: Vec<f64>) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(ForecastError::InvalidParameter(
                "step must be positive".to_string(),
            ));
        }
        let timestamps = (0..values.len() as i64).map(|i| origin + step * i as i32).collect();
        Self::new(timestamps, values)
    }

    /// Create an annual series: one observation per year starting at
    /// `start_year`.
    pub fn yearly(start_year: i32, values: Vec<f64>) -> Result<Self> {
        let timestamps = (0..values.len())
            .map(|i| {
                Utc.with_ymd_and_hms(start_year + i as i32, 1, 1, 0, 0, 0)
                    .single()
                    .ok_or_else(|| {
                        ForecastError::InvalidParameter(format!(
                            "invalid year {}",
                            start_year + i as i32
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(timestamps, values)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observation timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Observation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last observed value, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Copy the half-open observation range `[start, end)` into a new series.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "slice [{start}, {end}) out of range for series of length {}",
                self.len()
            )));
        }
        Ok(Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Split into `[0, index)` and `[index, len)`, the usual train/test cut.
    pub fn split_at(&self, index: usize) -> Result<(Self, Self)> {
        Ok((self.slice(0, index)?, self.slice(index, self.len())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hourly(values: Vec<f64>) -> TimeSeries {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::regular(origin, Duration::hours(1), values).unwrap()
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let ts = vec![Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()];
        let result = TimeSeries::new(ts, vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::LengthMismatch { .. })));
    }

    #[test]
    fn new_rejects_unordered_timestamps() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = TimeSeries::new(vec![t0, t1], vec![1.0, 2.0]);
        assert_eq!(result, Err(ForecastError::UnorderedTimestamps));

        // Duplicates are also rejected
        let result = TimeSeries::new(vec![t0, t0], vec![1.0, 2.0]);
        assert_eq!(result, Err(ForecastError::UnorderedTimestamps));
    }

    #[test]
    fn empty_series_is_valid() {
        let series = TimeSeries::new(vec![], vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.last_value().is_none());
    }

    #[test]
    fn regular_spaces_timestamps_evenly() {
        let series = hourly(vec![1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
        let stamps = series.timestamps();
        assert_eq!(stamps[2] - stamps[1], Duration::hours(1));
    }

    #[test]
    fn regular_rejects_nonpositive_step() {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = TimeSeries::regular(origin, Duration::zero(), vec![1.0]);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn yearly_starts_at_january_first() {
        let series = TimeSeries::yearly(1990, vec![11.2, 11.5, 11.1]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.timestamps()[0],
            Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            series.timestamps()[2],
            Utc.with_ymd_and_hms(1992, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn slice_copies_requested_range() {
        let series = hourly(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let window = series.slice(1, 4).unwrap();
        assert_eq!(window.values(), &[2.0, 3.0, 4.0]);
        assert_eq!(window.timestamps()[0], series.timestamps()[1]);
    }

    #[test]
    fn slice_out_of_range_errors() {
        let series = hourly(vec![1.0, 2.0]);
        assert!(series.slice(0, 3).is_err());
        assert!(series.slice(2, 1).is_err());
    }

    #[test]
    fn split_at_partitions_the_series() {
        let series = hourly(vec![1.0, 2.0, 3.0, 4.0]);
        let (train, test) = series.split_at(3).unwrap();
        assert_eq!(train.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(test.values(), &[4.0]);
    }
}
