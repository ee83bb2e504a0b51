//! Error types for the gridcast library.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building series, fitting models, or
/// evaluating forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input series has no observations.
    #[error("empty input series")]
    EmptySeries,

    /// Not enough observations for the requested operation.
    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// Timestamps are not strictly increasing.
    #[error("timestamps must be strictly increasing")]
    UnorderedTimestamps,

    /// Two sequences that must align have different lengths.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// A parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Forecast requested from an unfitted model.
    #[error("model must be fitted before forecasting")]
    NotFitted,

    /// Numerical failure during estimation.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = ForecastError::InsufficientObservations { needed: 12, got: 7 };
        assert_eq!(
            err.to_string(),
            "insufficient observations: need at least 12, got 7"
        );

        let err = ForecastError::LengthMismatch { expected: 5, got: 3 };
        assert_eq!(err.to_string(), "length mismatch: expected 5, got 3");

        let err = ForecastError::NotFitted;
        assert_eq!(err.to_string(), "model must be fitted before forecasting");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err = ForecastError::EmptySeries;
        assert_eq!(err, err.clone());
    }
}
