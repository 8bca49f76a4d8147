//! Error types for ReportKit

use thiserror::Error;

/// Errors that can occur during fetch operations
///
/// Every request-level variant carries the URL that failed so callers in a
/// fallback loop can log which candidate was skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https:// ({url})")]
    InvalidUrlScheme { url: String },

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Failed to connect to server
    #[error("Failed to connect to server: {url}")]
    ConnectError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Other request error
    #[error("Request failed for {url}: {message}")]
    RequestError { url: String, message: String },
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            FetchError::ConnectError {
                url: url.to_string(),
                source: err,
            }
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::RequestError {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// The URL this failure concerns, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::InvalidUrlScheme { url }
            | FetchError::Timeout { url }
            | FetchError::ConnectError { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::RequestError { url, .. } => Some(url),
            FetchError::ClientBuildError(_) => None,
        }
    }
}

/// Outcome of a failed source resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No primary URL was given
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// Neither the portal path nor the web search produced a usable report
    #[error("No usable report found for {url}")]
    NotFound { url: String },
}

/// Errors raised by the study assistant and chat model clients
#[derive(Debug, Error)]
pub enum ChatError {
    /// No API key configured
    #[error("Missing API key")]
    MissingApiKey,

    /// The session has no report loaded yet
    #[error("No report loaded: resolve a report first")]
    NoReport,

    /// Transport-level failure talking to the chat API
    #[error("Chat request failed")]
    Http(#[from] reqwest::Error),

    /// The chat API answered with a non-success status
    #[error("Chat API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The chat API answered without any message content
    #[error("Chat API returned no content")]
    EmptyResponse,
}
