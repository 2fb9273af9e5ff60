//! Date-indexed volatility index levels (VIX, VXY, ...).

use chrono::NaiveDate;

use crate::core::CarryError;
use crate::market::table::validate_dates;

/// Volatility index observations on an ascending, duplicate-free date index.
///
/// The series need not share the price table's calendar: the engine computes every
/// volatility-derived field on this series' own index before joining by date.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawVolatilitySeries")]
pub struct VolatilitySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct RawVolatilitySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TryFrom<RawVolatilitySeries> for VolatilitySeries {
    type Error = CarryError;

    fn try_from(raw: RawVolatilitySeries) -> Result<Self, Self::Error> {
        Self::new(raw.dates, raw.values)
    }
}

impl VolatilitySeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, CarryError> {
        if dates.len() != values.len() {
            return Err(CarryError::InvalidTable(format!(
                "volatility series has {} values for {} dates",
                values.len(),
                dates.len()
            )));
        }
        validate_dates(&dates, "volatility series")?;
        Ok(Self { dates, values })
    }

    /// Builds a series from `(date, level)` observations.
    pub fn from_observations<I>(observations: I) -> Result<Self, CarryError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, values) = observations.into_iter().unzip();
        Self::new(dates, values)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Level on `date`, if observed.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|i| self.values[i])
            .filter(|x| x.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_date() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 2, day).unwrap();
        let vix = VolatilitySeries::from_observations([(d(3), 14.0), (d(4), f64::NAN), (d(6), 18.5)])
            .unwrap();
        assert_eq!(vix.get(d(3)), Some(14.0));
        assert_eq!(vix.get(d(4)), None);
        assert_eq!(vix.get(d(5)), None);
        assert_eq!(vix.get(d(6)), Some(18.5));
    }

    #[test]
    fn validates_shape() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 2, day).unwrap();
        assert!(VolatilitySeries::new(vec![d(1), d(2)], vec![1.0]).is_err());
        assert!(VolatilitySeries::new(vec![d(2), d(1)], vec![1.0, 2.0]).is_err());
    }
}
