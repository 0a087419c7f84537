use thiserror::Error;

/// Errors from a hosting-platform call.
#[derive(Debug, Error)]
pub enum HostingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is GitHub's `message` field when present.
    #[error("GitHub returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}
