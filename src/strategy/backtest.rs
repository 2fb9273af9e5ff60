//! Augmented carry-trade table returned by the engine.

use chrono::NaiveDate;

use crate::core::{Position, VolatilityMode};
use crate::risk::{PerformanceSummary, equity_curve};

/// Output column holding the aggregate portfolio return.
pub const CARRY_RETURN_COLUMN: &str = "carry_return";
/// Output column holding the expanding volatility threshold.
pub const THRESHOLD_COLUMN: &str = "threshold";
/// Output column holding the binary trade signal.
pub const SIGNAL_COLUMN: &str = "signal";
/// Output column holding the gated portfolio return.
pub const STRATEGY_RETURN_COLUMN: &str = "strategy_return";

/// Per-asset input and derived fields over the output dates.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AssetLeg {
    pub asset: String,
    pub spot_field: String,
    pub forward_field: String,
    pub spot: Vec<f64>,
    pub forward: Vec<f64>,
    /// Simple spot return from the previous input date.
    pub returns: Vec<f64>,
    /// `(forward - spot) / spot` on the same date.
    pub premiums: Vec<f64>,
    pub positions: Vec<Position>,
}

impl AssetLeg {
    pub fn return_column(&self) -> String {
        format!("{}_ret", self.asset)
    }

    pub fn premium_column(&self) -> String {
        format!("{}_premium", self.asset)
    }

    pub fn position_column(&self) -> String {
        format!("{}_pos", self.asset)
    }
}

/// Volatility filter fields over the output dates.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VolatilityOverlay {
    pub index_name: String,
    pub mode: VolatilityMode,
    /// Lagged index level.
    pub level: Vec<f64>,
    /// Lagged level over trailing average; `averaged` mode only.
    pub change: Option<Vec<f64>>,
    /// Lagged expanding quantile of the indicator.
    pub threshold: Vec<f64>,
    pub signal: Vec<u8>,
    /// `carry_return * signal`.
    pub strategy_return: Vec<f64>,
    /// Largest number of price dates that reused an earlier volatility value in one field.
    pub forward_filled: usize,
}

impl VolatilityOverlay {
    pub fn change_column(&self) -> String {
        format!("{}_change", self.index_name)
    }

    /// Fraction of dates on which the filter allowed trading.
    pub fn exposure(&self) -> Option<f64> {
        (!self.signal.is_empty()).then(|| {
            self.signal.iter().map(|&s| usize::from(s)).sum::<usize>() as f64
                / self.signal.len() as f64
        })
    }
}

/// Carry-trade backtest: input prices, per-asset derived fields, portfolio returns and the
/// optional volatility overlay, all on the same ascending dates.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CarryBacktest {
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) n_trade: usize,
    pub(crate) input_columns: Vec<String>,
    pub(crate) legs: Vec<AssetLeg>,
    pub(crate) carry_return: Vec<f64>,
    pub(crate) volatility: Option<VolatilityOverlay>,
}

impl CarryBacktest {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn n_trade(&self) -> usize {
        self.n_trade
    }

    pub fn legs(&self) -> &[AssetLeg] {
        &self.legs
    }

    pub fn leg(&self, asset: &str) -> Option<&AssetLeg> {
        self.legs.iter().find(|l| l.asset == asset)
    }

    pub fn carry_return(&self) -> &[f64] {
        &self.carry_return
    }

    pub fn volatility(&self) -> Option<&VolatilityOverlay> {
        self.volatility.as_ref()
    }

    /// Strategy returns when the volatility filter is active, carry returns otherwise.
    pub fn returns(&self) -> &[f64] {
        self.volatility
            .as_ref()
            .map_or(self.carry_return.as_slice(), |v| v.strategy_return.as_slice())
    }

    /// Assets holding `side` on output row `row`, in asset order.
    pub fn assets_with(&self, row: usize, side: Position) -> Vec<&str> {
        self.legs
            .iter()
            .filter(|l| l.positions.get(row) == Some(&side))
            .map(|l| l.asset.as_str())
            .collect()
    }

    /// Compounded wealth path of [`returns`](Self::returns).
    pub fn equity_curve(&self) -> Vec<f64> {
        equity_curve(self.returns())
    }

    /// Performance statistics of [`returns`](Self::returns).
    pub fn summary(&self, periods_per_year: f64) -> Option<PerformanceSummary> {
        PerformanceSummary::from_returns(self.returns(), periods_per_year)
    }

    /// Column names in output order.
    ///
    /// Input columns come first, then `{asset}_ret`, `{asset}_premium` and `{asset}_pos`
    /// per asset, `carry_return`, and finally the volatility columns when filtering is on:
    /// `{index}`, `{index}_change` (averaged mode), `threshold`, `signal`,
    /// `strategy_return`.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.input_columns.clone();
        for leg in &self.legs {
            names.push(leg.return_column());
            names.push(leg.premium_column());
        }
        names.extend(self.legs.iter().map(AssetLeg::position_column));
        names.push(CARRY_RETURN_COLUMN.to_string());
        if let Some(vol) = &self.volatility {
            names.push(vol.index_name.clone());
            if vol.change.is_some() {
                names.push(vol.change_column());
            }
            names.push(THRESHOLD_COLUMN.to_string());
            names.push(SIGNAL_COLUMN.to_string());
            names.push(STRATEGY_RETURN_COLUMN.to_string());
        }
        names
    }

    /// Looks up any output column by name as floats.
    ///
    /// Positions are reported as -1, 0 or 1 and the signal as 0 or 1.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if name == CARRY_RETURN_COLUMN {
            return Some(self.carry_return.clone());
        }
        if let Some(vol) = &self.volatility {
            match name {
                THRESHOLD_COLUMN => return Some(vol.threshold.clone()),
                SIGNAL_COLUMN => return Some(vol.signal.iter().map(|&s| f64::from(s)).collect()),
                STRATEGY_RETURN_COLUMN => return Some(vol.strategy_return.clone()),
                _ if name == vol.index_name => return Some(vol.level.clone()),
                _ if name == vol.change_column() => return vol.change.clone(),
                _ => {}
            }
        }
        self.legs.iter().find_map(|leg| {
            if name == leg.spot_field {
                Some(leg.spot.clone())
            } else if name == leg.forward_field {
                Some(leg.forward.clone())
            } else if name == leg.return_column() {
                Some(leg.returns.clone())
            } else if name == leg.premium_column() {
                Some(leg.premiums.clone())
            } else if name == leg.position_column() {
                Some(leg.positions.iter().map(|p| p.weight()).collect())
            } else {
                None
            }
        })
    }
}
