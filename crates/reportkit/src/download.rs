//! Document downloads
//!
//! [`DocumentRetriever`] is a thin layer over [`Fetcher::fetch_binary`] with
//! an optional in-process cache keyed by URL. The cache is bounded: once
//! full, new documents are returned but not stored. Nothing is evicted.

use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::types::RawDocument;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Fetches downloadable documents, optionally memoizing them by URL
pub struct DocumentRetriever<F> {
    fetcher: F,
    cache: Option<DocumentCache>,
}

struct DocumentCache {
    capacity: usize,
    entries: Mutex<HashMap<String, RawDocument>>,
}

impl<F: Fetcher> DocumentRetriever<F> {
    /// Create a retriever without caching
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: None,
        }
    }

    /// Keep up to `capacity` documents in memory
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = Some(DocumentCache {
            capacity,
            entries: Mutex::new(HashMap::new()),
        });
        self
    }

    /// Fetch a document's bytes and content type
    pub async fn fetch_document(&self, url: &str) -> Result<RawDocument, FetchError> {
        if let Some(cache) = &self.cache {
            if let Some(doc) = cache.entries.lock().await.get(url) {
                debug!(url = %url, "Document cache hit");
                return Ok(doc.clone());
            }
        }

        let doc = self.fetcher.fetch_binary(url).await?;
        debug!(
            url = %url,
            content_type = %doc.content_type,
            size = doc.bytes.len(),
            "Document fetched"
        );

        if let Some(cache) = &self.cache {
            let mut entries = cache.entries.lock().await;
            if entries.len() < cache.capacity {
                entries.insert(url.to_string(), doc.clone());
            }
        }

        Ok(doc)
    }

    /// Number of cached documents
    pub async fn cached_len(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.entries.lock().await.len(),
            None => 0,
        }
    }
}
