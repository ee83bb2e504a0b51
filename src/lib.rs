//! # gridcast
//!
//! Seasonal ARIMA order selection and univariate time series forecasting.
//!
//! The centerpiece is [`selection::OrderSearch`]: an exhaustive sweep over
//! candidate SARIMA orders, one fit per candidate, ranked ascending by
//! information criterion. Around it the crate carries the models the
//! search needs and the tooling to judge them: a conditional-sum-of-squares
//! [SARIMA](models::SARIMA) model, an [autoregression](models::Autoregression),
//! [Holt-Winters](models::HoltWinters) smoothing, an augmented Dickey-Fuller
//! test, accuracy metrics and holdout evaluation.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]

pub mod core;
pub mod error;
pub mod models;
pub mod selection;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::Forecaster;
    pub use crate::selection::{CandidateOrder, OrderGrid, OrderSearch, RankedOrder};
    pub use crate::utils::{accuracy, AccuracyMetrics};
}
