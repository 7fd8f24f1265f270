pub mod notices;
pub mod search;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Shared HTTP client for all adapters in one invocation.
pub fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("tender/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
