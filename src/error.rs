//! Error types for the BBC schedule client

/// Result type alias for schedule client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when fetching or parsing schedules
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed at the transport level
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Gateway answered with a non-200 status
    #[error("unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Resource missing on the gateway (404)
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Response body was not valid JSON
    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON was well-formed but did not match the schedule schema
    #[error("schedule parsing failed: {0}")]
    Parsing(String),

    /// Top-level fragment key is not one of the recognized entity types
    #[error("unrecognized fragment type: {0}")]
    UnrecognizedType(String),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error while handling a downloaded file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a parsing error from a string
    pub fn parsing(msg: impl Into<String>) -> Self {
        Self::Parsing(msg.into())
    }

    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error came from the parse step rather than the wire
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Json(_) | Error::Parsing(_) | Error::UnrecognizedType(_)
        )
    }
}
