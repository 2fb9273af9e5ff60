//! Date-indexed spot/forward price table and its typed asset mapping.
//!
//! Columns follow the quoting convention `{asset}` for spot and `{asset}1m` for the
//! 1-month outright forward. [`PriceTable::asset_map`] resolves that convention once into an
//! [`AssetMap`], so downstream code addresses fields by position instead of by name.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::CarryError;

/// Tenor marker appended to a spot column name to form its forward column name.
pub const FORWARD_SUFFIX: &str = "1m";

/// One named column of a [`PriceTable`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Spot and forward prices on an ascending, duplicate-free date index.
///
/// Non-finite values are treated as missing observations.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use fxcarry::market::PriceTable;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let table = PriceTable::new(vec![d(2), d(3)])
///     .unwrap()
///     .with_asset("EUR", vec![1.10, 1.11], vec![1.102, 1.112])
///     .unwrap();
/// let assets = table.asset_map().unwrap();
/// assert_eq!(assets.len(), 1);
/// assert_eq!(assets.pairs()[0].forward_field, "EUR1m");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPriceTable")]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<PriceColumn>,
}

#[derive(serde::Deserialize)]
struct RawPriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<PriceColumn>,
}

impl TryFrom<RawPriceTable> for PriceTable {
    type Error = CarryError;

    fn try_from(raw: RawPriceTable) -> Result<Self, Self::Error> {
        raw.columns
            .into_iter()
            .try_fold(Self::new(raw.dates)?, |table, column| {
                table.with_column(column.name, column.values)
            })
    }
}

impl PriceTable {
    /// Empty table on the given date index.
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self, CarryError> {
        validate_dates(&dates, "price table")?;
        Ok(Self {
            dates,
            columns: Vec::new(),
        })
    }

    /// Appends a column; fails on a duplicate name or a length mismatch.
    pub fn push_column<S: Into<String>>(
        &mut self,
        name: S,
        values: Vec<f64>,
    ) -> Result<(), CarryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CarryError::InvalidTable(
                "column name must not be empty".to_string(),
            ));
        }
        if values.len() != self.dates.len() {
            return Err(CarryError::InvalidTable(format!(
                "column '{name}' has {} values for {} dates",
                values.len(),
                self.dates.len()
            )));
        }
        if self.column(&name).is_some() {
            return Err(CarryError::InvalidTable(format!(
                "duplicate column '{name}'"
            )));
        }
        self.columns.push(PriceColumn { name, values });
        Ok(())
    }

    /// Consuming form of [`push_column`](Self::push_column).
    pub fn with_column<S: Into<String>>(
        mut self,
        name: S,
        values: Vec<f64>,
    ) -> Result<Self, CarryError> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Appends the spot column `asset` and forward column `{asset}1m`.
    pub fn with_asset(
        self,
        asset: &str,
        spot: Vec<f64>,
        forward: Vec<f64>,
    ) -> Result<Self, CarryError> {
        self.with_column(asset, spot)?
            .with_column(forward_field(asset), forward)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Pairs every spot column with its forward column.
    ///
    /// Assets are ordered as their spot columns appear in the table. Fails with
    /// [`CarryError::MissingForward`] or [`CarryError::OrphanForward`] when the naming
    /// convention is not respected.
    pub fn asset_map(&self) -> Result<AssetMap, CarryError> {
        let index: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let mut pairs = Vec::new();
        for (spot_index, column) in self.columns.iter().enumerate() {
            if is_forward_field(&column.name) {
                let asset = &column.name[..column.name.len() - FORWARD_SUFFIX.len()];
                if asset.is_empty() || !index.contains_key(asset) {
                    return Err(CarryError::OrphanForward {
                        column: column.name.clone(),
                    });
                }
                continue;
            }
            let forward_name = forward_field(&column.name);
            let forward_index =
                *index
                    .get(forward_name.as_str())
                    .ok_or_else(|| CarryError::MissingForward {
                        asset: column.name.clone(),
                    })?;
            pairs.push(AssetPair {
                asset: column.name.clone(),
                spot_field: column.name.clone(),
                forward_field: forward_name,
                spot_index,
                forward_index,
            });
        }

        tracing::debug!(assets = pairs.len(), "resolved spot/forward asset map");
        Ok(AssetMap { pairs })
    }
}

/// Spot and forward fields of one asset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetPair {
    pub asset: String,
    pub spot_field: String,
    pub forward_field: String,
    /// Position of the spot column in the source table.
    pub spot_index: usize,
    /// Position of the forward column in the source table.
    pub forward_index: usize,
}

/// Validated asset to `{spot_field, forward_field}` mapping, in spot-column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetMap {
    pairs: Vec<AssetPair>,
}

impl AssetMap {
    pub fn pairs(&self) -> &[AssetPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, asset: &str) -> Option<&AssetPair> {
        self.pairs.iter().find(|p| p.asset == asset)
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.asset.as_str())
    }

    /// Fails unless both legs of `n_trade` assets fit.
    ///
    /// A leg size whose double overflows `usize` reports `required = usize::MAX`.
    pub fn require_legs(&self, n_trade: usize) -> Result<(), CarryError> {
        let required = n_trade.checked_mul(2).unwrap_or(usize::MAX);
        if self.pairs.len() < required {
            return Err(CarryError::InsufficientAssets {
                assets: self.pairs.len(),
                required,
            });
        }
        Ok(())
    }
}

/// Forward column name of an asset.
pub fn forward_field(asset: &str) -> String {
    format!("{asset}{FORWARD_SUFFIX}")
}

fn is_forward_field(name: &str) -> bool {
    name.ends_with(FORWARD_SUFFIX)
}

/// Checks that dates are strictly ascending (hence unique).
pub(crate) fn validate_dates(dates: &[NaiveDate], what: &str) -> Result<(), CarryError> {
    if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
        let reason = if w[1] == w[0] {
            "duplicate"
        } else {
            "out-of-order"
        };
        return Err(CarryError::InvalidTable(format!(
            "{what} has {reason} date {} after {}",
            w[1], w[0]
        )));
    }
    Ok(())
}
