//! Shared utilities for model estimation and evaluation.

pub mod holdout;
pub mod metrics;
pub mod ols;
pub mod optimization;
pub mod stats;

pub use holdout::{evaluate_holdout, HoldoutConfig, HoldoutReport};
pub use metrics::{accuracy, AccuracyMetrics};
pub use ols::{least_squares, LeastSquares};
pub use optimization::{minimize, Minimum, SimplexOptions};
pub use stats::quantile_normal;
