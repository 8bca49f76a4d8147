//! Fetcher abstraction for network access
//!
//! Design: every outbound GET in the pipeline goes through [`Fetcher`], so
//! the resolver and the download layer can be driven by in-memory stubs.
//! [`HttpFetcher`] is the production implementation.

mod http;

pub use http::HttpFetcher;

use crate::error::FetchError;
use crate::types::RawDocument;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for page and document fetchers
///
/// Implementations perform a single attempt per call. Non-success statuses,
/// timeouts and network errors all surface as [`FetchError`]; retrying a
/// different URL is the caller's job.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch a text/HTML page and return its raw markup
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a binary document with its content type
    async fn fetch_binary(&self, url: &str) -> Result<RawDocument, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_text(url).await
    }

    async fn fetch_binary(&self, url: &str) -> Result<RawDocument, FetchError> {
        (**self).fetch_binary(url).await
    }
}
