use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::coin::CoinRecord;
use crate::errors::CoreError;

/// What the market store remembers about the last failed fetch.
///
/// Either a plain message (transport errors, decode errors) or the payload
/// the server sent back with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchError {
    Message(String),
    Payload(serde_json::Value),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Message(msg) => write!(f, "{msg}"),
            FetchError::Payload(serde_json::Value::String(s)) => write!(f, "{s}"),
            FetchError::Payload(value) => write!(f, "{value}"),
        }
    }
}

impl From<CoreError> for FetchError {
    /// Prefer the server's own error body; fall back to the error message.
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::ApiResponse { body, .. } if !body.is_null() => FetchError::Payload(body),
            other => FetchError::Message(other.to_string()),
        }
    }
}

impl From<&str> for FetchError {
    fn from(msg: &str) -> Self {
        FetchError::Message(msg.to_string())
    }
}

impl From<String> for FetchError {
    fn from(msg: String) -> Self {
        FetchError::Message(msg)
    }
}

/// Normalized market snapshot plus fetch status.
///
/// `entities` is only ever replaced as a whole. `error` is meaningful once
/// `loading` is back to `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// coin id → record, from the latest successful fetch
    pub entities: HashMap<String, CoinRecord>,

    /// True while a fetch is in flight
    pub loading: bool,

    /// Set by a failed fetch, cleared when the next fetch starts
    pub error: Option<FetchError>,

    /// Time of the last successful fetch
    pub last_updated: Option<DateTime<Utc>>,
}
