use std::fmt;
use std::str::FromStr;

use crate::core::CarryError;

/// Signed trade direction held in one asset on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Funded leg: lowest forward premium (highest discount).
    Long,
    /// Not traded on this date.
    Neutral,
    /// Funding leg: highest forward premium.
    Short,
}

impl Position {
    /// Returns +1 for long, -1 for short and 0 for neutral.
    pub fn sign(self) -> i8 {
        match self {
            Self::Long => 1,
            Self::Neutral => 0,
            Self::Short => -1,
        }
    }

    /// Signed direction as a float weight multiplier.
    #[inline]
    pub fn weight(self) -> f64 {
        f64::from(self.sign())
    }
}

/// Volatility-regime signal methodology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityMode {
    /// Compare the raw index level with its expanding quantile.
    #[default]
    Simple,
    /// Compare the index level relative to its trailing average with the expanding quantile
    /// of that ratio.
    Averaged,
}

impl VolatilityMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Averaged => "averaged",
        }
    }
}

impl fmt::Display for VolatilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolatilityMode {
    type Err = CarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "averaged" => Ok(Self::Averaged),
            other => Err(CarryError::Config(format!(
                "unsupported volatility mode '{other}', expected one of: simple, averaged"
            ))),
        }
    }
}

/// Interpolation rule used when an empirical quantile falls between two order statistics.
///
/// With `n` sorted observations `x_0 <= ... <= x_{n-1}` and virtual index `h = q (n - 1)`:
/// - `Linear`: `x_floor(h) + (h - floor(h)) (x_ceil(h) - x_floor(h))`,
/// - `Lower`: `x_floor(h)`,
/// - `Higher`: `x_ceil(h)`,
/// - `Midpoint`: `(x_floor(h) + x_ceil(h)) / 2`,
/// - `Nearest`: `x_round(h)`, with halves rounded to the even index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantileMethod {
    Linear,
    Lower,
    Higher,
    Midpoint,
    #[default]
    Nearest,
}

impl QuantileMethod {
    pub const ALL: [QuantileMethod; 5] = [
        Self::Linear,
        Self::Lower,
        Self::Higher,
        Self::Midpoint,
        Self::Nearest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Lower => "lower",
            Self::Higher => "higher",
            Self::Midpoint => "midpoint",
            Self::Nearest => "nearest",
        }
    }
}

impl fmt::Display for QuantileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantileMethod {
    type Err = CarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| {
                CarryError::Config(format!(
                    "unsupported quantile method '{key}', expected one of: linear, lower, higher, midpoint, nearest"
                ))
            })
    }
}
