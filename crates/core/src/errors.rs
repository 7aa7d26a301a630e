use thiserror::Error;

/// Unified error type for the entire coin-dashboard-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Store operations never fail. Errors produced while fetching are turned
/// into a [`FetchError`](crate::models::market::FetchError) and recorded in
/// the market store instead of being returned to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    /// Non-2xx response that carried a body. `body` is the parsed JSON payload
    /// when the body was JSON, otherwise the raw text as a JSON string.
    #[error("API error ({provider}): HTTP {status}: {body}")]
    ApiResponse {
        provider: String,
        status: u16,
        body: serde_json::Value,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Input / Configuration ───────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full request URL; keep the path, drop the query.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` in a message that contains a URL.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
