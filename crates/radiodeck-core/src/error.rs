//! Error types for directory requests and media playback.
//!
//! Every error here is handled at the operation that produced it: a failed
//! feed leaves its region untouched, a failed search sets a status line, a
//! failed play resets one control icon. Nothing is retried.

/// Result alias for directory API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures talking to the station-directory API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, DNS, TLS or other transport failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("directory returned status {0}")]
    Status(reqwest::StatusCode),

    /// The body was not a JSON array of station records.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status(status)
        } else {
            ApiError::Transport(e)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// A stream could not be started (unsupported format, unreachable host,
/// player gone).
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("player unavailable: {0}")]
    Unavailable(String),

    #[error("stream failed to start: {0}")]
    Stream(String),
}
