//! Error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HunterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API key missing")]
    MissingApiKey,

    #[error("Request quota exhausted ({used} used)")]
    QuotaExhausted { used: u64 },

    #[error("Quota unavailable: {0}")]
    QuotaUnavailable(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

impl HunterError {
    /// Text shown to the user for a failed action.
    ///
    /// Transport failures stay generic; API rejections carry the raw body.
    pub fn user_message(&self) -> String {
        match self {
            HunterError::Http(_) => "Could not reach the odds service, try again".to_string(),
            HunterError::Api { status, body } => {
                format!("Odds service rejected the request ({}): {}", status, body)
            }
            HunterError::MissingApiKey => "Enter your API key to continue".to_string(),
            HunterError::QuotaExhausted { .. } => {
                "No requests left on this API key, searches are disabled".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HunterError>;
