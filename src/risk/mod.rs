//! Risk and performance analytics for strategy return series.

pub mod performance;

pub use performance::{
    PerformanceSummary, TRADING_DAYS_PER_YEAR, equity_curve, historical_var, max_drawdown,
};
