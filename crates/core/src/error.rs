//! Unified error types for lookout.
//!
//! Only transport-level failures and invalid tool input surface as errors.
//! Extraction degrades instead of failing.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the lookout server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-success status or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// The caller cancelled the request while it was in flight.
    #[error("ABORTED: request cancelled")]
    Aborted,
}

impl Error {
    /// Whether this error came from the caller cancelling the request.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted)
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::Aborted => (-32800, "Request cancelled".to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
