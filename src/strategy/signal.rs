//! Volatility-regime trade filter.
//!
//! Two methodologies decide whether the carry portfolio trades on a date:
//!
//! - `simple`: trade while the index level is at or below the expanding-window quantile of
//!   its own history,
//! - `averaged`: divide the level by its trailing average over the previous
//!   `average_window` observations (excluding the current one) and trade while that ratio is
//!   at or below the expanding quantile of the ratio's history.
//!
//! All fields are computed on the volatility series' own index and delayed by `lag`
//! observations, so the signal on date `t` only uses information known `lag` periods
//! earlier. They are then left-joined onto the carry dates and forward-filled.

use chrono::NaiveDate;

use crate::core::{CarryError, VolatilityFilter, VolatilityMode};
use crate::market::VolatilitySeries;
use crate::math::{expanding_quantile, forward_fill, observed, ratio, shift, trailing_mean};

/// Lagged volatility fields on the volatility series' own dates.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityFields {
    pub dates: Vec<NaiveDate>,
    pub level: Vec<Option<f64>>,
    /// Level over trailing average; `averaged` mode only.
    pub change: Option<Vec<Option<f64>>>,
    pub threshold: Vec<Option<f64>>,
}

impl VolatilityFields {
    /// Validates `filter`, computes level, change and threshold, and applies the lag.
    pub fn compute(
        series: &VolatilitySeries,
        filter: &VolatilityFilter,
    ) -> Result<Self, CarryError> {
        filter.validate()?;
        let level = observed(series.values());
        let (change, threshold) = match filter.mode {
            VolatilityMode::Simple => {
                let threshold = expanding_quantile(&level, filter.quantile, filter.method);
                (None, threshold)
            }
            VolatilityMode::Averaged => {
                let average = shift(&trailing_mean(&level, filter.average_window), 1);
                let change = ratio(&level, &average);
                let threshold = expanding_quantile(&change, filter.quantile, filter.method);
                (Some(change), threshold)
            }
        };

        Ok(Self {
            dates: series.dates().to_vec(),
            level: shift(&level, filter.lag),
            change: change.map(|c| shift(&c, filter.lag)),
            threshold: shift(&threshold, filter.lag),
        })
    }

    /// Left-joins the fields onto `dates` and forward-fills each of them.
    pub fn align(&self, dates: &[NaiveDate]) -> AlignedVolatility {
        let rows: Vec<Option<usize>> = dates
            .iter()
            .map(|d| self.dates.binary_search(d).ok())
            .collect();
        let pick = |field: &[Option<f64>]| -> Vec<Option<f64>> {
            rows.iter().map(|r| r.and_then(|i| field[i])).collect()
        };

        let (level, filled_level) = forward_fill(&pick(&self.level));
        let (threshold, filled_threshold) = forward_fill(&pick(&self.threshold));
        let (change, filled_change) = match &self.change {
            Some(change) => {
                let (filled, count) = forward_fill(&pick(change));
                (Some(filled), count)
            }
            None => (None, 0),
        };

        AlignedVolatility {
            level,
            change,
            threshold,
            forward_filled: filled_level.max(filled_threshold).max(filled_change),
        }
    }
}

/// Volatility fields joined onto the carry dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedVolatility {
    pub level: Vec<Option<f64>>,
    pub change: Option<Vec<Option<f64>>>,
    pub threshold: Vec<Option<f64>>,
    /// Largest number of rows filled from an earlier row in any one field.
    pub forward_filled: usize,
}

impl AlignedVolatility {
    /// True when every field is available on `row`.
    pub fn is_complete(&self, row: usize) -> bool {
        self.level[row].is_some()
            && self.threshold[row].is_some()
            && self.change.as_ref().is_none_or(|c| c[row].is_some())
    }

    /// Trading signal on a complete row: 1 while the indicator is at or below the
    /// threshold.
    pub fn signal(&self, row: usize) -> Option<u8> {
        let indicator = match &self.change {
            Some(change) => change[row]?,
            None => self.level[row]?,
        };
        let threshold = self.threshold[row]?;
        Some(u8::from(indicator <= threshold))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::QuantileMethod;

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(n))
            .unwrap()
    }

    fn series(values: &[f64]) -> VolatilitySeries {
        VolatilitySeries::new((0..values.len() as u64).map(day).collect(), values.to_vec()).unwrap()
    }

    fn filter(mode: VolatilityMode, lag: usize) -> VolatilityFilter {
        VolatilityFilter {
            mode,
            lag,
            method: QuantileMethod::Lower,
            quantile: 0.5,
            average_window: 2,
            ..VolatilityFilter::new("VIX")
        }
    }

    #[test]
    fn simple_mode_threshold_is_expanding_quantile() {
        let vix = series(&[10.0, 30.0, 20.0, 40.0]);
        let fields = VolatilityFields::compute(&vix, &filter(VolatilityMode::Simple, 0)).unwrap();
        assert!(fields.change.is_none());
        assert_eq!(
            fields.threshold,
            vec![Some(10.0), Some(10.0), Some(20.0), Some(20.0)]
        );

        let aligned = fields.align(&fields.dates);
        let signals: Vec<_> = (0..4).map(|r| aligned.signal(r).unwrap()).collect();
        assert_eq!(signals, vec![1, 0, 1, 0]);
    }

    #[test]
    fn lag_delays_every_field() {
        let vix = series(&[10.0, 30.0, 20.0, 40.0]);
        let fields = VolatilityFields::compute(&vix, &filter(VolatilityMode::Simple, 1)).unwrap();
        assert_eq!(fields.level, vec![None, Some(10.0), Some(30.0), Some(20.0)]);
        assert_eq!(
            fields.threshold,
            vec![None, Some(10.0), Some(10.0), Some(20.0)]
        );
    }

    #[test]
    fn averaged_mode_divides_by_prior_window_mean() {
        let vix = series(&[10.0, 20.0, 30.0, 15.0, 60.0]);
        let fields = VolatilityFields::compute(&vix, &filter(VolatilityMode::Averaged, 0)).unwrap();
        let change = fields.change.as_ref().unwrap();
        assert_eq!(change[0], None);
        assert_eq!(change[1], None);
        // 30 / mean(10, 20)
        assert_relative_eq!(change[2].unwrap(), 2.0);
        // 15 / mean(20, 30)
        assert_relative_eq!(change[3].unwrap(), 0.6);
        // 60 / mean(30, 15)
        assert_relative_eq!(change[4].unwrap(), 60.0 / 22.5);
        assert_eq!(fields.threshold[1], None);
        assert_eq!(fields.threshold[2], Some(2.0));
        assert_eq!(fields.threshold[3], Some(0.6));
    }

    #[test]
    fn alignment_forward_fills_missing_dates() {
        let vix = VolatilitySeries::new(vec![day(0), day(2)], vec![12.0, 14.0]).unwrap();
        let fields = VolatilityFields::compute(&vix, &filter(VolatilityMode::Simple, 0)).unwrap();
        let aligned = fields.align(&[day(0), day(1), day(2), day(3)]);
        assert_eq!(
            aligned.level,
            vec![Some(12.0), Some(12.0), Some(14.0), Some(14.0)]
        );
        assert_eq!(aligned.forward_filled, 2);
        assert!((0..4).all(|r| aligned.is_complete(r)));

        // Filling only runs down the joined rows; nothing precedes the first one here.
        let before = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let sparse = fields.align(&[before, day(5)]);
        assert_eq!(sparse.level, vec![None, None]);
        assert!(!sparse.is_complete(1));
    }

    #[test]
    fn out_of_domain_filter_is_rejected() {
        let vix = series(&[10.0, 30.0, 20.0]);
        let bad_quantile = VolatilityFilter {
            quantile: 1.5,
            ..filter(VolatilityMode::Simple, 0)
        };
        assert!(matches!(
            VolatilityFields::compute(&vix, &bad_quantile),
            Err(CarryError::Config(_))
        ));
        let empty_window = VolatilityFilter {
            average_window: 0,
            ..filter(VolatilityMode::Averaged, 0)
        };
        assert!(matches!(
            VolatilityFields::compute(&vix, &empty_window),
            Err(CarryError::Config(_))
        ));
    }
}
