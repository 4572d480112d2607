use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    /// Missing or malformed user input. Blocks dispatch entirely.
    #[error("{0}")]
    Validation(String),

    #[error("API key not found. Please set it up first.")]
    CredentialMissing,

    /// Non-2xx status or an error envelope from the endpoint. The message
    /// has already been extracted from the body.
    #[error("{0}")]
    Transport(String),

    #[error("No summary text received")]
    EmptyResult,

    #[error("Catalog lookup failed: {0}")]
    Lookup(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Failed to access local storage: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SummaryError {
    /// Whether the error was raised before any network call was made.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SummaryError::Validation(_) | SummaryError::CredentialMissing
        )
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(error: reqwest::Error) -> Self {
        SummaryError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(error: serde_json::Error) -> Self {
        SummaryError::Storage(format!("serialization: {error}"))
    }
}

impl From<std::io::Error> for SummaryError {
    fn from(error: std::io::Error) -> Self {
        SummaryError::Storage(error.to_string())
    }
}

impl From<anyhow::Error> for SummaryError {
    fn from(error: anyhow::Error) -> Self {
        SummaryError::Transport(error.to_string())
    }
}
