//! Carry-trade strategy: engine, volatility-regime filter, and the augmented output table.

pub mod backtest;
pub mod carry;
pub mod signal;

pub use backtest::{
    AssetLeg, CARRY_RETURN_COLUMN, CarryBacktest, SIGNAL_COLUMN, STRATEGY_RETURN_COLUMN,
    THRESHOLD_COLUMN, VolatilityOverlay,
};
pub use carry::{CarryTradeEngine, carry_trade};
pub use signal::{AlignedVolatility, VolatilityFields};
