//! Error types for the grab pipeline

use thiserror::Error;

/// Custom error types for the grab pipeline
#[derive(Error, Debug)]
pub enum GrabError {
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from '{url}'")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no playlist entries match selector '{selector}'")]
    EmptyPlaylist { selector: String },

    #[error("attribute '{attribute}' on '{selector}' did not match within {timeout_secs}s")]
    WatchTimeout {
        selector: String,
        attribute: String,
        timeout_secs: u64,
    },

    #[error("attribute watch on '{selector}' closed before a matching value arrived")]
    WatchClosed { selector: String },

    #[error("track {track}: maximum retry attempts ({max_retries}) exceeded: {last_error}")]
    MaxRetriesExceeded {
        /// 1-based track number in playback order
        track: usize,
        max_retries: usize,
        last_error: String,
    },

    #[error("archive write failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("a grab is already in progress")]
    AlreadyRunning,

    #[error("page interaction failed: {0}")]
    Page(String),

    #[error("internal pipeline error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GrabError>;

impl GrabError {
    /// Check if error is recoverable (should retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            GrabError::HttpRequest { .. } | GrabError::Io(_) => true,
            GrabError::HttpStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// Get error category for metrics and logs
    pub fn category(&self) -> &'static str {
        match self {
            GrabError::HttpRequest { .. } => "http",
            GrabError::HttpStatus { .. } => "http_status",
            GrabError::Io(_) => "io",
            GrabError::InvalidUrl { .. } => "url",
            GrabError::EmptyPlaylist { .. } => "playlist",
            GrabError::WatchTimeout { .. } => "watch_timeout",
            GrabError::WatchClosed { .. } => "watch_closed",
            GrabError::MaxRetriesExceeded { .. } => "max_retries",
            GrabError::Archive(_) => "archive",
            GrabError::AlreadyRunning => "already_running",
            GrabError::Page(_) => "page",
            GrabError::Internal(_) => "internal",
        }
    }
}
