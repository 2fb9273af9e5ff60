//! Market-data containers: the spot/forward price table and volatility index series.

pub mod table;
pub mod volatility;

pub use table::{AssetMap, AssetPair, FORWARD_SUFFIX, PriceColumn, PriceTable, forward_field};
pub use volatility::VolatilitySeries;
