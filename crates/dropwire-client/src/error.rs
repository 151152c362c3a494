//! Client error types.

use thiserror::Error;

/// Errors from outbound requests and file handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed or returned an error status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server accepted the request but reported a failure.
    #[error("server rejected request: {0}")]
    Rejected(String),

    /// Local filesystem error while saving a download.
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    /// No usable destination directory for a download.
    #[error("no writable downloads directory")]
    NoDownloadDir,
}
