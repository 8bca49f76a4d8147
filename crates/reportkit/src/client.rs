//! HTTP client configuration for ReportKit
//!
//! The fetch logic itself lives in the [`fetchers`](crate::fetchers) module;
//! this module holds the options shared by every fetcher.

use crate::DEFAULT_USER_AGENT;
use std::time::Duration;

/// Default timeout for HTML/text pages
pub const DEFAULT_TEXT_TIMEOUT: Duration = Duration::from_secs(12);

/// Default timeout for binary document downloads
pub const DEFAULT_BINARY_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetch options
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Custom User-Agent (defaults to [`DEFAULT_USER_AGENT`])
    pub user_agent: Option<String>,
    /// Timeout for text/HTML requests
    pub text_timeout: Duration,
    /// Timeout for binary document requests
    pub binary_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            text_timeout: DEFAULT_TEXT_TIMEOUT,
            binary_timeout: DEFAULT_BINARY_TIMEOUT,
        }
    }
}

impl FetchOptions {
    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the text page timeout
    pub fn text_timeout(mut self, timeout: Duration) -> Self {
        self.text_timeout = timeout;
        self
    }

    /// Set the binary download timeout
    pub fn binary_timeout(mut self, timeout: Duration) -> Self {
        self.binary_timeout = timeout;
        self
    }

    /// User-Agent that will actually be sent
    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
