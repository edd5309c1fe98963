use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter both drug names.";
pub const GENERIC_SERVER_ERROR: &str = "Server error occurred";

/// Ways a single submission can fail.
///
/// Every variant ends the submission in `SessionState::Error` with the
/// `Display` text as the message. None of them is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredictionError {
    /// Empty input. Raised before any network call.
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    /// Endpoint that is not an absolute http(s) URL. Raised before any
    /// network call.
    #[error("Invalid backend URL: {0}")]
    InvalidEndpoint(String),

    /// Non-2xx reply. Holds the server's `error` text or the generic message.
    #[error("{0}")]
    Backend(String),

    /// 2xx reply whose body is not a complete `PredictionResponse`.
    #[error("Malformed response from server: {0}")]
    MalformedResponse(String),

    /// Connection, DNS, timeout or read failure.
    #[error("Network error: {0}")]
    Transport(String),
}

/// Failure below the HTTP status line: the request never produced a reply.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for PredictionError {
    fn from(err: TransportError) -> Self {
        PredictionError::Transport(err.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write history export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode history csv: {0}")]
    Csv(#[from] csv::Error),
}
