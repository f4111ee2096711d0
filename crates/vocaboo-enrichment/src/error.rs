#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Request cancelled")]
    Cancelled,
}

impl EnrichError {
    /// Map an unsuccessful HTTP status to an error
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            429 => EnrichError::RateLimitExceeded,
            401 | 403 => EnrichError::AuthenticationError,
            _ => EnrichError::ApiError(format!("HTTP {}", status)),
        }
    }
}
