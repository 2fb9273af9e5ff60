//! JSON helpers for configuration and backtest payloads.
//!
//! Both directions operate on in-memory strings; callers own any file or transport handling.
//!
//! # Examples
//! ```rust
//! use fxcarry::core::{CarryTradeConfig, from_json, to_json_pretty};
//!
//! let config = CarryTradeConfig::default();
//! let json = to_json_pretty(&config).expect("json serialization");
//! let decoded: CarryTradeConfig = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, config);
//! ```

use serde::de::DeserializeOwned;

use crate::core::CarryError;

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String, CarryError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CarryError::Config(format!("json serialization failed: {e}")))
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, CarryError> {
    serde_json::from_str(payload).map_err(|e| CarryError::Config(format!("invalid json: {e}")))
}
