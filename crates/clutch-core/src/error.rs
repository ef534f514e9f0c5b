use thiserror::Error;

/// Application-wide error types for the scraper.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request could not be completed (transport-level failure).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Input or settings file problem.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for HTTP 4xx responses, which the fetcher treats as terminal
    /// on the first attempt.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::HttpStatus { status, .. } if (400..500).contains(status))
    }
}
