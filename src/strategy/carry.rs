//! Cross-sectional FX carry trade.
//!
//! On every date the assets are ranked by forward premium `(F - S) / S`. The `n_trade`
//! assets with the lowest premium (largest forward discount, i.e. the highest-yielding
//! currencies against the quote currency) are held long, the `n_trade` with the highest
//! premium are held short, and each leg is equally weighted:
//!
//! `carry_return_t = sum_a (pos_a,t / n_trade) * r_a,t`
//!
//! where `r_a,t` is the simple spot return of asset `a` from the previous input date.
//!
//! The pipeline is a chain of value-returning stages over a borrowed [`PriceTable`]:
//! derive returns/premiums, select complete rows, rank, aggregate, and optionally gate the
//! result with a volatility-regime signal (see [`crate::strategy::signal`]).
//!
//! References:
//! - Burnside, Eichenbaum and Rebelo (2011), *Carry Trade and Momentum in Currency Markets*.
//! - Menkhoff, Sarno, Schmeling and Schrimpf (2012), *Carry Trades and Global Foreign
//!   Exchange Volatility*.

use chrono::NaiveDate;

use crate::core::{
    CarryError, CarryTradeConfig, Position, QuantileMethod, VolatilityFilter, VolatilityMode,
};
use crate::market::{AssetMap, PriceTable, VolatilitySeries};
use crate::math::{observed, pct_change};
use crate::strategy::backtest::{AssetLeg, CarryBacktest, VolatilityOverlay};
use crate::strategy::signal::VolatilityFields;

/// Carry-trade backtest engine.
///
/// The engine holds only its configuration; [`compute`](Self::compute) is a pure function of
/// its arguments and can be called repeatedly or from several threads.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use fxcarry::core::{CarryTradeConfig, Position};
/// use fxcarry::market::PriceTable;
/// use fxcarry::strategy::CarryTradeEngine;
///
/// let dates: Vec<NaiveDate> = (1..=3)
///     .map(|d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
///     .collect();
/// let table = PriceTable::new(dates)
///     .unwrap()
///     .with_asset("AUD", vec![0.66, 0.67, 0.665], vec![0.659, 0.669, 0.664])
///     .unwrap()
///     .with_asset("JPY", vec![150.0, 151.0, 152.0], vec![149.4, 150.4, 151.4])
///     .unwrap()
///     .with_asset("CHF", vec![0.90, 0.91, 0.905], vec![0.897, 0.907, 0.902])
///     .unwrap()
///     .with_asset("GBP", vec![1.25, 1.26, 1.27], vec![1.2505, 1.2605, 1.2705])
///     .unwrap();
///
/// let engine = CarryTradeEngine::new(CarryTradeConfig::with_n_trade(1)).unwrap();
/// let bt = engine.compute(&table, None).unwrap();
/// assert_eq!(bt.len(), 2);
/// assert_eq!(bt.assets_with(0, Position::Long), vec!["JPY"]);
/// assert_eq!(bt.assets_with(0, Position::Short), vec!["GBP"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CarryTradeEngine {
    config: CarryTradeConfig,
}

impl CarryTradeEngine {
    /// Validates `config` and builds an engine.
    pub fn new(config: CarryTradeConfig) -> Result<Self, CarryError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CarryTradeConfig {
        &self.config
    }

    /// Runs the backtest.
    ///
    /// `volatility` is required when the configuration carries a volatility filter and is
    /// ignored otherwise. Dates lacking a complete observation are dropped from the output,
    /// which can therefore be empty.
    pub fn compute(
        &self,
        table: &PriceTable,
        volatility: Option<&VolatilitySeries>,
    ) -> Result<CarryBacktest, CarryError> {
        let n_trade = self.config.n_trade;
        let filter = match &self.config.volatility {
            Some(filter) => {
                let series = volatility.ok_or_else(|| CarryError::MissingVolatilitySeries {
                    index_name: filter.index_name.clone(),
                })?;
                Some((filter, series))
            }
            None => None,
        };

        let assets = table.asset_map()?;
        assets.require_legs(n_trade)?;

        let legs = derive_legs(table, &assets);
        let rows = complete_rows(&legs, table.len(), self.config.premium_lag);
        tracing::debug!(
            dates = table.len(),
            retained = rows.len(),
            assets = assets.len(),
            "selected dates with complete spot/forward history"
        );

        let positions = rank_positions(&legs, &rows, n_trade, self.config.premium_lag);
        let carry = carry_returns(&legs, &rows, &positions, n_trade);
        let ranked = Ranked {
            rows,
            positions,
            carry,
        };

        let Some((filter, series)) = filter else {
            return Ok(materialize(table, &assets, &legs, ranked, n_trade, None));
        };

        let dates: Vec<NaiveDate> = ranked.rows.iter().map(|&t| table.dates()[t]).collect();
        let fields = VolatilityFields::compute(series, filter)?;
        let aligned = fields.align(&dates);
        if aligned.forward_filled > 0 {
            tracing::warn!(
                index = %filter.index_name,
                rows = aligned.forward_filled,
                "volatility values carried forward onto dates without a fresh observation"
            );
        }

        // Indices into `ranked` that survive the volatility join.
        let kept: Vec<usize> = (0..ranked.len())
            .filter(|&i| aligned.is_complete(i))
            .collect();
        tracing::debug!(
            index = %filter.index_name,
            mode = %filter.mode,
            retained = kept.len(),
            warmup = ranked.len() - kept.len(),
            "joined volatility signal"
        );

        let signal: Vec<u8> = kept
            .iter()
            .map(|&i| aligned.signal(i).unwrap_or(0))
            .collect();
        let pick = |field: &[Option<f64>]| -> Vec<f64> {
            kept.iter().map(|&i| field[i].unwrap_or(f64::NAN)).collect()
        };
        let ranked = ranked.retain(&kept);
        let strategy_return = ranked
            .carry
            .iter()
            .zip(&signal)
            .map(|(r, s)| r * f64::from(*s))
            .collect();

        let overlay = VolatilityOverlay {
            index_name: filter.index_name.clone(),
            mode: filter.mode,
            level: pick(&aligned.level),
            change: aligned.change.as_deref().map(pick),
            threshold: pick(&aligned.threshold),
            signal,
            strategy_return,
            forward_filled: aligned.forward_filled,
        };

        Ok(materialize(
            table,
            &assets,
            &legs,
            ranked,
            n_trade,
            Some(overlay),
        ))
    }

    /// Runs [`compute`](Self::compute) over independent inputs in order.
    pub fn compute_batch(
        &self,
        inputs: &[(&PriceTable, Option<&VolatilitySeries>)],
    ) -> Vec<Result<CarryBacktest, CarryError>> {
        inputs
            .iter()
            .map(|(table, vol)| self.compute(table, *vol))
            .collect()
    }

    /// Parallel [`compute_batch`](Self::compute_batch) on the Rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn compute_batch_parallel(
        &self,
        inputs: &[(&PriceTable, Option<&VolatilitySeries>)],
    ) -> Vec<Result<CarryBacktest, CarryError>> {
        use rayon::prelude::*;

        inputs
            .par_iter()
            .map(|(table, vol)| self.compute(table, *vol))
            .collect()
    }
}

/// Positional-argument form of [`CarryTradeEngine::compute`].
///
/// Volatility filtering is enabled by `volatility_index`; the remaining volatility
/// parameters are ignored without it.
#[allow(clippy::too_many_arguments)]
pub fn carry_trade(
    table: &PriceTable,
    n_trade: usize,
    volatility: Option<&VolatilitySeries>,
    volatility_index: Option<&str>,
    volatility_mode: VolatilityMode,
    volatility_quantile: f64,
    quantile_method: QuantileMethod,
    volatility_lag: usize,
) -> Result<CarryBacktest, CarryError> {
    let config = CarryTradeConfig {
        n_trade,
        volatility: volatility_index.map(|name| VolatilityFilter {
            mode: volatility_mode,
            quantile: volatility_quantile,
            method: quantile_method,
            lag: volatility_lag,
            ..VolatilityFilter::new(name)
        }),
        ..CarryTradeConfig::default()
    };
    CarryTradeEngine::new(config)?.compute(table, volatility)
}

/// Gap-aware series for one asset over every input date.
#[derive(Debug, Clone)]
struct LegSeries {
    spot: Vec<Option<f64>>,
    forward: Vec<Option<f64>>,
    returns: Vec<Option<f64>>,
    premiums: Vec<Option<f64>>,
}

/// Complete input rows with their positions and portfolio return.
#[derive(Debug, Clone)]
struct Ranked {
    rows: Vec<usize>,
    positions: Vec<Vec<Position>>,
    carry: Vec<f64>,
}

impl Ranked {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn retain(self, kept: &[usize]) -> Self {
        Self {
            rows: kept.iter().map(|&i| self.rows[i]).collect(),
            positions: kept.iter().map(|&i| self.positions[i].clone()).collect(),
            carry: kept.iter().map(|&i| self.carry[i]).collect(),
        }
    }
}

fn derive_legs(table: &PriceTable, assets: &AssetMap) -> Vec<LegSeries> {
    let columns = table.columns();
    assets
        .pairs()
        .iter()
        .map(|pair| {
            let spot = observed(&columns[pair.spot_index].values);
            let forward = observed(&columns[pair.forward_index].values);
            let returns = pct_change(&spot);
            let premiums = spot
                .iter()
                .zip(&forward)
                .map(|(s, f)| match (s, f) {
                    (Some(s), Some(f)) if *s != 0.0 => Some((f - s) / s),
                    _ => None,
                })
                .collect();
            LegSeries {
                spot,
                forward,
                returns,
                premiums,
            }
        })
        .collect()
}

/// Dates on which every asset has spot, forward, return and premium, and a ranking
/// premium `premium_lag` rows earlier.
fn complete_rows(legs: &[LegSeries], len: usize, premium_lag: usize) -> Vec<usize> {
    (premium_lag..len)
        .filter(|&t| {
            legs.iter().all(|leg| {
                leg.spot[t].is_some()
                    && leg.forward[t].is_some()
                    && leg.returns[t].is_some()
                    && leg.premiums[t].is_some()
                    && leg.premiums[t - premium_lag].is_some()
            })
        })
        .collect()
}

/// Long the `n_trade` lowest ranking premiums, short the `n_trade` highest.
///
/// Equal premiums keep asset order (stable sort), so with ties the earlier asset is the
/// one treated as lower.
fn rank_positions(
    legs: &[LegSeries],
    rows: &[usize],
    n_trade: usize,
    premium_lag: usize,
) -> Vec<Vec<Position>> {
    let n_assets = legs.len();
    rows.iter()
        .map(|&t| {
            let premium = |a: usize| legs[a].premiums[t - premium_lag].unwrap_or(f64::NAN);
            let mut order: Vec<usize> = (0..n_assets).collect();
            order.sort_by(|&a, &b| premium(a).total_cmp(&premium(b)));

            let mut row = vec![Position::Neutral; n_assets];
            for &a in &order[..n_trade] {
                row[a] = Position::Long;
            }
            for &a in &order[n_assets - n_trade..] {
                row[a] = Position::Short;
            }
            tracing::trace!(row = t, ?order, "ranked forward premiums");
            row
        })
        .collect()
}

fn carry_returns(
    legs: &[LegSeries],
    rows: &[usize],
    positions: &[Vec<Position>],
    n_trade: usize,
) -> Vec<f64> {
    let scale = n_trade as f64;
    rows.iter()
        .zip(positions)
        .map(|(&t, row)| {
            legs.iter()
                .zip(row)
                .map(|(leg, pos)| pos.weight() / scale * leg.returns[t].unwrap_or(0.0))
                .sum()
        })
        .collect()
}

fn materialize(
    table: &PriceTable,
    assets: &AssetMap,
    legs: &[LegSeries],
    ranked: Ranked,
    n_trade: usize,
    volatility: Option<VolatilityOverlay>,
) -> CarryBacktest {
    let rows = &ranked.rows;
    let take = |series: &[Option<f64>]| -> Vec<f64> {
        rows.iter()
            .map(|&t| series[t].unwrap_or(f64::NAN))
            .collect()
    };

    let out_legs = assets
        .pairs()
        .iter()
        .zip(legs)
        .enumerate()
        .map(|(a, (pair, leg))| AssetLeg {
            asset: pair.asset.clone(),
            spot_field: pair.spot_field.clone(),
            forward_field: pair.forward_field.clone(),
            spot: take(&leg.spot),
            forward: take(&leg.forward),
            returns: take(&leg.returns),
            premiums: take(&leg.premiums),
            positions: ranked.positions.iter().map(|row| row[a]).collect(),
        })
        .collect();

    CarryBacktest {
        dates: rows.iter().map(|&t| table.dates()[t]).collect(),
        n_trade,
        input_columns: table.column_names().map(str::to_string).collect(),
        legs: out_legs,
        carry_return: ranked.carry,
        volatility,
    }
}
