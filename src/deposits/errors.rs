use thiserror::Error;

/// Error types for deposit listing and detail retrieval
#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
}

/// Error types for approve/reject status transitions
#[derive(Debug, Error)]
pub(crate) enum TransitionError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("transition rejected by backend: {0}")]
    Rejected(String),
}
