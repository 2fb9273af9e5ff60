//! Performance and tail-risk statistics of a periodic strategy return series.
//!
//! Returns are simple per-period returns (`0.01` = 1%). Annualization multiplies the mean by
//! `periods_per_year` and the sample standard deviation by its square root; the Sharpe
//! ratio is the ratio of the two (zero risk-free rate). Drawdowns are measured on the
//! compounded equity curve `prod(1 + r)`.
//!
//! VaR follows the loss-positive convention (`loss = -return`) and uses the linearly
//! interpolated empirical quantile of losses.

use crate::core::QuantileMethod;
use crate::math::empirical_quantile;

/// Trading days used when annualizing daily returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

const VAR_CONFIDENCE: f64 = 0.95;

/// Summary statistics of a return series.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerformanceSummary {
    pub observations: usize,
    /// `prod(1 + r) - 1`.
    pub total_return: f64,
    pub mean_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// `None` when volatility is zero or undefined.
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough decline of the equity curve, as a positive fraction.
    pub max_drawdown: f64,
    /// Share of positive returns among non-zero returns; `None` if all are zero.
    pub hit_rate: Option<f64>,
    /// One-period historical VaR at 95%, positive loss.
    pub value_at_risk_95: f64,
}

impl PerformanceSummary {
    /// Summarizes `returns`; `None` for an empty series.
    ///
    /// # Examples
    /// ```rust
    /// use fxcarry::risk::PerformanceSummary;
    ///
    /// let s = PerformanceSummary::from_returns(&[0.01, -0.02, 0.03], 252.0).unwrap();
    /// assert_eq!(s.observations, 3);
    /// assert!((s.total_return - (1.01 * 0.98 * 1.03 - 1.0)).abs() < 1e-12);
    /// assert!(s.max_drawdown > 0.0);
    /// ```
    pub fn from_returns(returns: &[f64], periods_per_year: f64) -> Option<Self> {
        if returns.is_empty() {
            return None;
        }
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let std = sample_std(returns, mean);
        let annualized_return = mean * periods_per_year;
        let annualized_volatility = std * periods_per_year.sqrt();
        let sharpe_ratio = (annualized_volatility > 0.0 && annualized_volatility.is_finite())
            .then(|| annualized_return / annualized_volatility);

        let curve = equity_curve(returns);
        let total_return = curve.last().copied().unwrap_or(1.0) - 1.0;

        let (wins, active) = returns
            .iter()
            .filter(|r| **r != 0.0)
            .fold((0usize, 0usize), |(w, a), r| (w + usize::from(*r > 0.0), a + 1));
        let hit_rate = (active > 0).then(|| wins as f64 / active as f64);

        Some(Self {
            observations: returns.len(),
            total_return,
            mean_return: mean,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: max_drawdown(&curve),
            hit_rate,
            value_at_risk_95: historical_var(returns, VAR_CONFIDENCE).unwrap_or(0.0),
        })
    }
}

/// Compounded wealth path starting from 1 before the first return.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

/// Largest relative decline from a running peak; the initial wealth of 1 counts as a peak.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;
    for &wealth in curve {
        peak = peak.max(wealth);
        if peak > 0.0 {
            worst = worst.max(1.0 - wealth / peak);
        }
    }
    worst
}

/// Historical Value-at-Risk of a return sample as a non-negative loss.
///
/// `None` for an empty sample or a confidence outside `(0, 1)`.
pub fn historical_var(returns: &[f64], confidence: f64) -> Option<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return None;
    }
    let losses: Vec<f64> = returns.iter().map(|r| -r).collect();
    empirical_quantile(&losses, confidence, QuantileMethod::Linear).map(|v| v.max(0.0))
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let ss = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
    (ss / (values.len() as f64 - 1.0)).sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, StandardNormal};

    use super::*;

    #[test]
    fn empty_series_has_no_summary() {
        assert!(PerformanceSummary::from_returns(&[], TRADING_DAYS_PER_YEAR).is_none());
    }

    #[test]
    fn flat_series_has_no_sharpe_or_hit_rate() {
        let s = PerformanceSummary::from_returns(&[0.0; 10], TRADING_DAYS_PER_YEAR).unwrap();
        assert_eq!(s.total_return, 0.0);
        assert_eq!(s.sharpe_ratio, None);
        assert_eq!(s.hit_rate, None);
        assert_eq!(s.max_drawdown, 0.0);
        assert_eq!(s.value_at_risk_95, 0.0);
    }

    #[test]
    fn drawdown_tracks_peak_to_trough() {
        // Wealth: 1.1, 0.88, 0.968 -> trough 0.88 from peak 1.1.
        let curve = equity_curve(&[0.1, -0.2, 0.1]);
        assert_relative_eq!(max_drawdown(&curve), 0.2, epsilon = 1e-12);
        // A first-period loss is measured from the initial wealth.
        assert_relative_eq!(max_drawdown(&equity_curve(&[-0.05])), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn hit_rate_ignores_flat_periods() {
        let s = PerformanceSummary::from_returns(&[0.01, 0.0, -0.01, 0.02], 12.0).unwrap();
        assert_relative_eq!(s.hit_rate.unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn annualization_scales_mean_and_volatility() {
        let mut rng = StdRng::seed_from_u64(11);
        let returns: Vec<f64> = (0..5000)
            .map(|_| {
                let z: f64 = StandardNormal.sample(&mut rng);
                0.0004 + 0.01 * z
            })
            .collect();
        let s = PerformanceSummary::from_returns(&returns, TRADING_DAYS_PER_YEAR).unwrap();
        assert!((s.annualized_volatility - 0.01 * TRADING_DAYS_PER_YEAR.sqrt()).abs() < 0.01);
        assert_relative_eq!(
            s.annualized_return,
            s.mean_return * TRADING_DAYS_PER_YEAR,
            epsilon = 1e-12
        );
        // Normal 95% loss quantile is about 1.645 sigma less the drift.
        assert!((s.value_at_risk_95 - (1.645 * 0.01 - 0.0004)).abs() < 0.002);
    }

    #[test]
    fn var_rejects_invalid_confidence() {
        assert_eq!(historical_var(&[0.01], 1.0), None);
        assert_eq!(historical_var(&[], 0.95), None);
    }
}
