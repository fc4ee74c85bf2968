//! Feed client error types.

/// Errors that can occur when fetching the GBFS feeds.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Request failed before a response arrived (connection, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The HTTP client could not be built from the given settings.
    #[error("invalid feed configuration: {message}")]
    Config { message: String },
}

impl FeedError {
    /// Whether the failure came from talking to the upstream feed, as
    /// opposed to making sense of what it returned.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Http(_) | FeedError::Api { .. })
    }
}
