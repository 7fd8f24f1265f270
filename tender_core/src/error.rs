// src/error.rs

/// Failure of a single adapter call.
///
/// Adapter failures are recorded, not thrown: every call site converts them
/// into a labeled error-list entry at the orchestrator or pagination
/// boundary. A failed call is terminal for that call; no retries happen
/// anywhere in this crate.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("missing credentials: {0}")]
    AuthMissing(String),

    #[error("upstream HTTP status {0}")]
    HttpStatus(u16),

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AdapterError {
    pub fn code_str(&self) -> &'static str {
        match self {
            AdapterError::Timeout(_) => "timeout",
            AdapterError::AuthMissing(_) => "auth_missing",
            AdapterError::HttpStatus(_) => "http_status",
            AdapterError::ParseFailure(_) => "parse_failure",
            AdapterError::Http(e) if e.is_timeout() => "timeout",
            AdapterError::Http(_) => "upstream_error",
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            AdapterError::Timeout(_) => true,
            AdapterError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
