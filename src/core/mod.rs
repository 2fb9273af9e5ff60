//! Core error taxonomy, enumerated parameter types, and engine configuration.

pub mod config;
pub mod serialization;
pub mod types;

pub use config::{
    CarryTradeConfig, CarryTradeConfigBuilder, DEFAULT_AVERAGE_WINDOW, DEFAULT_N_TRADE,
    DEFAULT_VOLATILITY_LAG, DEFAULT_VOLATILITY_QUANTILE, VolatilityFilter,
};
pub use serialization::{from_json, to_json_pretty};
pub use types::*;

/// Errors surfaced by table construction, configuration, and the carry engine.
///
/// Missing observations are never reported here: the engine narrows its output to the
/// dates where every required field is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarryError {
    /// Fewer assets than the two legs require.
    #[error("insufficient assets: {assets} available, {required} required (2 * n_trade)")]
    InsufficientAssets { assets: usize, required: usize },
    /// A spot column has no `{asset}1m` forward partner.
    #[error("spot column '{asset}' has no matching forward column '{asset}1m'")]
    MissingForward { asset: String },
    /// A forward column has no spot partner.
    #[error("forward column '{column}' has no matching spot column")]
    OrphanForward { column: String },
    /// Malformed table or series (dates, lengths, duplicate names).
    #[error("invalid table: {0}")]
    InvalidTable(String),
    /// Parameter outside its enumerated set or numeric domain.
    #[error("configuration error: {0}")]
    Config(String),
    /// Volatility filtering is configured but no series was supplied.
    #[error("volatility filter on '{index_name}' requires a volatility series")]
    MissingVolatilitySeries { index_name: String },
}

impl CarryError {
    /// True for errors caused by the shape of the price table (asset count, naming).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientAssets { .. } | Self::MissingForward { .. } | Self::OrphanForward { .. }
        )
    }
}
