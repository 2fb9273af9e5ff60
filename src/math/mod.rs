//! Numerical kernels: empirical quantiles and gap-aware time-series transforms.

pub mod quantile;
pub mod timeseries;

pub use quantile::{ExpandingQuantile, empirical_quantile, expanding_quantile};
pub use timeseries::{forward_fill, observed, pct_change, ratio, shift, trailing_mean};
