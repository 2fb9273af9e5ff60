//! Carry-trade engine configuration.
//!
//! `CarryTradeConfig` holds the ranking parameters and an optional [`VolatilityFilter`].
//! The filter's presence is what enables volatility gating; its `index_name` labels the
//! joined volatility column in the output table.
//!
//! Configurations can be built in code through [`CarryTradeConfigBuilder`] or decoded from
//! JSON, where omitted fields fall back to the defaults below.
//!
//! # Examples
//! ```rust
//! use fxcarry::core::{CarryTradeConfig, QuantileMethod, VolatilityMode};
//!
//! let config = CarryTradeConfig::builder()
//!     .n_trade(2)
//!     .volatility_index("VIX")
//!     .volatility_mode(VolatilityMode::Averaged)
//!     .volatility_quantile(0.9)
//!     .quantile_method(QuantileMethod::Linear)
//!     .volatility_lag(0)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.n_trade, 2);
//! assert_eq!(config.volatility.unwrap().index_name, "VIX");
//! ```

use crate::core::{CarryError, QuantileMethod, VolatilityMode};

/// Number of assets held in each leg when not specified.
pub const DEFAULT_N_TRADE: usize = 3;
/// Quantile level of the expanding volatility threshold.
pub const DEFAULT_VOLATILITY_QUANTILE: f64 = 0.95;
/// Periods by which volatility-derived fields are delayed.
pub const DEFAULT_VOLATILITY_LAG: usize = 1;
/// Trailing window of the averaged volatility mode.
pub const DEFAULT_AVERAGE_WINDOW: usize = 60;

/// Volatility-regime filter settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VolatilityFilter {
    /// Name of the volatility index, e.g. `VIX` or `VXY`.
    pub index_name: String,
    #[serde(default)]
    pub mode: VolatilityMode,
    /// Quantile level in `[0, 1]` of the expanding threshold.
    #[serde(default = "default_quantile")]
    pub quantile: f64,
    #[serde(default)]
    pub method: QuantileMethod,
    /// Delay, in volatility-series periods, applied to level, change and threshold.
    #[serde(default = "default_lag")]
    pub lag: usize,
    /// Trailing-average window of the averaged mode.
    #[serde(default = "default_average_window")]
    pub average_window: usize,
}

impl VolatilityFilter {
    /// Filter on `index_name` with default mode, quantile, method, lag and window.
    pub fn new<S: Into<String>>(index_name: S) -> Self {
        Self {
            index_name: index_name.into(),
            mode: VolatilityMode::default(),
            quantile: DEFAULT_VOLATILITY_QUANTILE,
            method: QuantileMethod::default(),
            lag: DEFAULT_VOLATILITY_LAG,
            average_window: DEFAULT_AVERAGE_WINDOW,
        }
    }

    /// Checks name, quantile level and averaging window.
    pub fn validate(&self) -> Result<(), CarryError> {
        if self.index_name.trim().is_empty() {
            return Err(CarryError::Config(
                "volatility index name must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(CarryError::Config(format!(
                "volatility quantile must be in [0, 1], got {}",
                self.quantile
            )));
        }
        if self.average_window == 0 {
            return Err(CarryError::Config(
                "average_window must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Output column holding the level-to-average ratio (averaged mode only).
    pub fn change_column(&self) -> String {
        format!("{}_change", self.index_name)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CarryTradeConfig {
    /// Assets held long and, separately, short on each date.
    #[serde(default = "default_n_trade")]
    pub n_trade: usize,
    /// Rows between the premium used for ranking and the traded date.
    ///
    /// `0` ranks on the same date's premium; `1` ranks on the previous date's premium.
    #[serde(default)]
    pub premium_lag: usize,
    /// Volatility-regime filter; `None` disables gating.
    #[serde(default)]
    pub volatility: Option<VolatilityFilter>,
}

impl Default for CarryTradeConfig {
    fn default() -> Self {
        Self {
            n_trade: DEFAULT_N_TRADE,
            premium_lag: 0,
            volatility: None,
        }
    }
}

impl CarryTradeConfig {
    /// Starts a configuration builder.
    #[inline]
    pub fn builder() -> CarryTradeConfigBuilder {
        CarryTradeConfigBuilder::default()
    }

    /// Ungated configuration trading `n_trade` assets per leg.
    pub fn with_n_trade(n_trade: usize) -> Self {
        Self {
            n_trade,
            ..Self::default()
        }
    }

    /// Checks every parameter domain.
    pub fn validate(&self) -> Result<(), CarryError> {
        if self.n_trade == 0 {
            return Err(CarryError::Config("n_trade must be >= 1".to_string()));
        }
        if let Some(filter) = &self.volatility {
            filter.validate()?;
        }
        Ok(())
    }

    /// Decodes and validates a JSON configuration.
    ///
    /// # Examples
    /// ```rust
    /// use fxcarry::core::{CarryTradeConfig, QuantileMethod};
    ///
    /// let config = CarryTradeConfig::from_json(
    ///     r#"{"n_trade": 2, "volatility": {"index_name": "VXY", "method": "linear"}}"#,
    /// )
    /// .unwrap();
    /// let filter = config.volatility.unwrap();
    /// assert_eq!(filter.method, QuantileMethod::Linear);
    /// assert_eq!(filter.lag, 1);
    /// ```
    pub fn from_json(payload: &str) -> Result<Self, CarryError> {
        let config: Self = crate::core::from_json(payload)?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for [`CarryTradeConfig`].
///
/// Volatility settings given without [`volatility_index`](Self::volatility_index) are
/// ignored, matching the rule that the index name is what enables filtering.
#[derive(Debug, Clone, Default)]
pub struct CarryTradeConfigBuilder {
    n_trade: Option<usize>,
    premium_lag: Option<usize>,
    index_name: Option<String>,
    mode: Option<VolatilityMode>,
    mode_name: Option<String>,
    quantile: Option<f64>,
    method: Option<QuantileMethod>,
    method_name: Option<String>,
    lag: Option<usize>,
    average_window: Option<usize>,
}

impl CarryTradeConfigBuilder {
    #[inline]
    pub fn n_trade(mut self, n_trade: usize) -> Self {
        self.n_trade = Some(n_trade);
        self
    }

    #[inline]
    pub fn premium_lag(mut self, premium_lag: usize) -> Self {
        self.premium_lag = Some(premium_lag);
        self
    }

    /// Enables volatility filtering on the named index.
    pub fn volatility_index<S: Into<String>>(mut self, index_name: S) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Takes every volatility setting from `filter`.
    pub fn volatility_filter(self, filter: VolatilityFilter) -> Self {
        self.volatility_index(filter.index_name)
            .volatility_mode(filter.mode)
            .volatility_quantile(filter.quantile)
            .quantile_method(filter.method)
            .volatility_lag(filter.lag)
            .average_window(filter.average_window)
    }

    #[inline]
    pub fn volatility_mode(mut self, mode: VolatilityMode) -> Self {
        self.mode = Some(mode);
        self.mode_name = None;
        self
    }

    /// Sets the mode from its name; unknown names fail in [`build`](Self::build).
    pub fn volatility_mode_name<S: Into<String>>(mut self, mode: S) -> Self {
        self.mode_name = Some(mode.into());
        self.mode = None;
        self
    }

    #[inline]
    pub fn volatility_quantile(mut self, quantile: f64) -> Self {
        self.quantile = Some(quantile);
        self
    }

    #[inline]
    pub fn quantile_method(mut self, method: QuantileMethod) -> Self {
        self.method = Some(method);
        self.method_name = None;
        self
    }

    /// Sets the quantile method from its name; unknown names fail in [`build`](Self::build).
    pub fn quantile_method_name<S: Into<String>>(mut self, method: S) -> Self {
        self.method_name = Some(method.into());
        self.method = None;
        self
    }

    #[inline]
    pub fn volatility_lag(mut self, lag: usize) -> Self {
        self.lag = Some(lag);
        self
    }

    #[inline]
    pub fn average_window(mut self, window: usize) -> Self {
        self.average_window = Some(window);
        self
    }

    /// Validates and builds a [`CarryTradeConfig`].
    pub fn build(self) -> Result<CarryTradeConfig, CarryError> {
        let mode = match (self.mode, self.mode_name) {
            (Some(mode), _) => mode,
            (None, Some(name)) => name.parse()?,
            (None, None) => VolatilityMode::default(),
        };
        let method = match (self.method, self.method_name) {
            (Some(method), _) => method,
            (None, Some(name)) => name.parse()?,
            (None, None) => QuantileMethod::default(),
        };

        let volatility = self.index_name.map(|index_name| VolatilityFilter {
            index_name,
            mode,
            quantile: self.quantile.unwrap_or(DEFAULT_VOLATILITY_QUANTILE),
            method,
            lag: self.lag.unwrap_or(DEFAULT_VOLATILITY_LAG),
            average_window: self.average_window.unwrap_or(DEFAULT_AVERAGE_WINDOW),
        });

        let config = CarryTradeConfig {
            n_trade: self.n_trade.unwrap_or(DEFAULT_N_TRADE),
            premium_lag: self.premium_lag.unwrap_or(0),
            volatility,
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_n_trade() -> usize {
    DEFAULT_N_TRADE
}

fn default_quantile() -> f64 {
    DEFAULT_VOLATILITY_QUANTILE
}

fn default_lag() -> usize {
    DEFAULT_VOLATILITY_LAG
}

fn default_average_window() -> usize {
    DEFAULT_AVERAGE_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_published_methodology() {
        let config = CarryTradeConfig::default();
        assert_eq!(config.n_trade, 3);
        assert_eq!(config.premium_lag, 0);
        assert!(config.volatility.is_none());

        let filter = VolatilityFilter::new("VIX");
        assert_eq!(filter.mode, VolatilityMode::Simple);
        assert_eq!(filter.quantile, 0.95);
        assert_eq!(filter.method, QuantileMethod::Nearest);
        assert_eq!(filter.lag, 1);
        assert_eq!(filter.average_window, 60);
        assert_eq!(filter.change_column(), "VIX_change");
    }

    #[test]
    fn builder_without_index_disables_filter() {
        let config = CarryTradeConfig::builder()
            .n_trade(2)
            .volatility_quantile(0.5)
            .build()
            .unwrap();
        assert!(config.volatility.is_none());
    }

    #[test]
    fn builder_rejects_out_of_domain_values() {
        assert!(matches!(
            CarryTradeConfig::builder().n_trade(0).build(),
            Err(CarryError::Config(_))
        ));
        assert!(
            CarryTradeConfig::builder()
                .volatility_index("VIX")
                .volatility_quantile(1.5)
                .build()
                .is_err()
        );
        assert!(
            CarryTradeConfig::builder()
                .volatility_index("VIX")
                .volatility_mode_name("garch")
                .build()
                .is_err()
        );
        assert!(
            CarryTradeConfig::builder()
                .volatility_index("VIX")
                .quantile_method_name("weibull")
                .build()
                .is_err()
        );
        assert!(
            CarryTradeConfig::builder()
                .volatility_index(" ")
                .build()
                .is_err()
        );
    }

    #[test]
    fn builder_accepts_names() {
        let config = CarryTradeConfig::builder()
            .volatility_index("VXY")
            .volatility_mode_name("averaged")
            .quantile_method_name("midpoint")
            .build()
            .unwrap();
        let filter = config.volatility.unwrap();
        assert_eq!(filter.mode, VolatilityMode::Averaged);
        assert_eq!(filter.method, QuantileMethod::Midpoint);
    }

    #[test]
    fn builder_takes_whole_filter() {
        let filter = VolatilityFilter {
            mode: VolatilityMode::Averaged,
            lag: 0,
            average_window: 20,
            ..VolatilityFilter::new("VXY")
        };
        let config = CarryTradeConfig::builder()
            .n_trade(1)
            .volatility_filter(filter.clone())
            .build()
            .unwrap();
        assert_eq!(config.volatility, Some(filter));
    }

    #[test]
    fn json_fills_defaults_and_rejects_unknown_mode() {
        let config = CarryTradeConfig::from_json(r#"{"volatility": {"index_name": "VIX"}}"#).unwrap();
        assert_eq!(config.n_trade, 3);
        assert_eq!(config.volatility.unwrap(), VolatilityFilter::new("VIX"));

        let err = CarryTradeConfig::from_json(
            r#"{"volatility": {"index_name": "VIX", "mode": "exotic"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CarryError::Config(_)));

        assert!(CarryTradeConfig::from_json(r#"{"n_trade": 0}"#).is_err());
    }
}
