//! Web search fallback
//!
//! A [`SearchProvider`] turns a keyword query into an ordered list of result
//! URLs. Order is whatever the engine returns; no re-ranking happens here.

mod duckduckgo;

pub use duckduckgo::{parse_results, DuckDuckGoSearch, DEFAULT_SEARCH_ENDPOINT};

use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;

/// Default number of search results tried by the resolver
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Trait for web search engines
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Identifier for this provider (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Return up to `max_results` absolute result URLs, in engine order
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, FetchError>;
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, FetchError> {
        (**self).search(query, max_results).await
    }
}
