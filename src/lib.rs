//! fxcarry is a currency carry-trade backtesting library: it ranks currencies by forward
//! premium, holds the deepest-discount currencies long against the richest-premium ones,
//! and optionally switches the portfolio off in high-volatility regimes.
//!
//! The crate is a stateless table transform. A [`market::PriceTable`] of spot (`{asset}`)
//! and 1-month forward (`{asset}1m`) prices, plus an optional [`market::VolatilitySeries`],
//! go in; a [`strategy::CarryBacktest`] carrying per-asset returns, premiums and positions,
//! the portfolio `carry_return`, and the volatility `signal`/`strategy_return` comes out.
//!
//! References used across modules include:
//! - Burnside, Eichenbaum and Rebelo (2011) for the cross-sectional carry portfolio.
//! - Menkhoff, Sarno, Schmeling and Schrimpf (2012) for volatility-conditioned carry.
//! - Hyndman and Fan (1996) for empirical quantile interpolation rules.
//!
//! Numerical considerations:
//! - Non-finite prices are treated as missing; dates without a complete observation for every
//!   asset are dropped rather than reported as errors.
//! - Expanding-window thresholds are maintained incrementally (two-heap order statistics), so
//!   long volatility histories stay `O(n log n)`.
//! - Forward-filled volatility values are not capped in age; the output reports how many
//!   dates reused an earlier value.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered batch evaluation of independent inputs.
//!
//! # Quick Start
//! Run an unfiltered carry backtest:
//! ```rust
//! use chrono::NaiveDate;
//! use fxcarry::core::CarryTradeConfig;
//! use fxcarry::market::PriceTable;
//! use fxcarry::strategy::CarryTradeEngine;
//!
//! let dates: Vec<NaiveDate> = (1..=4)
//!     .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
//!     .collect();
//! let table = PriceTable::new(dates)
//!     .unwrap()
//!     .with_asset("AUD", vec![0.65, 0.66, 0.655, 0.66], vec![0.6496, 0.6596, 0.6546, 0.6596])
//!     .unwrap()
//!     .with_asset("NZD", vec![0.61, 0.62, 0.615, 0.61], vec![0.6095, 0.6195, 0.6145, 0.6095])
//!     .unwrap()
//!     .with_asset("JPY", vec![0.0067, 0.0068, 0.0069, 0.0068], vec![0.00673, 0.00683, 0.00693, 0.00683])
//!     .unwrap()
//!     .with_asset("CHF", vec![1.12, 1.13, 1.14, 1.13], vec![1.1245, 1.1345, 1.1445, 1.1345])
//!     .unwrap();
//!
//! let engine = CarryTradeEngine::new(CarryTradeConfig::with_n_trade(1)).unwrap();
//! let bt = engine.compute(&table, None).unwrap();
//! assert_eq!(bt.len(), 3);
//! assert!(bt.column("carry_return").is_some());
//! assert!(bt.column("AUD_pos").is_some());
//! ```
//!
//! Gate the portfolio with a VIX regime filter:
//! ```rust
//! use chrono::NaiveDate;
//! use fxcarry::core::{CarryTradeConfig, QuantileMethod, VolatilityMode};
//! use fxcarry::market::{PriceTable, VolatilitySeries};
//! use fxcarry::strategy::CarryTradeEngine;
//!
//! let dates: Vec<NaiveDate> = (1..=5)
//!     .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
//!     .collect();
//! let mut table = PriceTable::new(dates.clone()).unwrap();
//! for (i, asset) in ["AUD", "NZD", "JPY", "CHF"].into_iter().enumerate() {
//!     let spot = vec![1.0, 1.01, 1.02, 1.01, 1.0];
//!     let premium = 0.001 * i as f64;
//!     let forward = spot.iter().map(|s| s * (1.0 + premium)).collect();
//!     table = table.with_asset(asset, spot, forward).unwrap();
//! }
//! let vix = VolatilitySeries::new(dates, vec![15.0, 14.0, 30.0, 16.0, 15.5]).unwrap();
//!
//! let config = CarryTradeConfig::builder()
//!     .n_trade(1)
//!     .volatility_index("VIX")
//!     .volatility_mode(VolatilityMode::Simple)
//!     .volatility_quantile(0.9)
//!     .quantile_method(QuantileMethod::Linear)
//!     .volatility_lag(1)
//!     .build()
//!     .unwrap();
//! let bt = CarryTradeEngine::new(config).unwrap().compute(&table, Some(&vix)).unwrap();
//! let overlay = bt.volatility().unwrap();
//! assert!(overlay.signal.iter().all(|s| *s <= 1));
//! assert_eq!(bt.returns(), overlay.strategy_return.as_slice());
//! ```
//!
//! Summarize performance:
//! ```rust
//! use fxcarry::risk::PerformanceSummary;
//!
//! let summary = PerformanceSummary::from_returns(&[0.002, -0.001, 0.0015], 252.0).unwrap();
//! assert!(summary.total_return > 0.0);
//! ```

pub mod core;
pub mod market;
pub mod math;
pub mod risk;
pub mod strategy;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::market::*;
    pub use crate::risk::PerformanceSummary;
    pub use crate::strategy::*;
}
