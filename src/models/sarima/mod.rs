//! Seasonal ARIMA model.
//!
//! Provides:
//! - Multiplicative SARIMA(p, d, q)(P, D, Q)\[s\] fitted by conditional
//!   sum of squares
//! - Differencing and integration helpers on both the regular and
//!   seasonal lag

pub mod diff;
mod model;

pub use model::{SarimaSpec, SARIMA};
