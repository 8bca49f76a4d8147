//! Source resolution
//!
//! Design: resolution is a strictly ordered chain of single attempts that
//! stops at the first page passing the text-length gate.
//!
//! 1. Listing page: try up to `max_listing_links` report-detail candidates
//! 2. Direct fetch of the primary URL
//! 3. Web search: try each result in engine order (`is_fallback = true`)
//!
//! Failures of individual candidates are logged and skipped. Only a failed
//! search request, or running out of candidates, ends in
//! [`ResolveError::NotFound`].

use crate::error::ResolveError;
use crate::extract::{extract_document_links, extract_report_links, extract_text};
use crate::extract::{MAX_DOCUMENT_LINKS, MAX_REPORT_LINKS};
use crate::fetchers::Fetcher;
use crate::search::{SearchProvider, MAX_SEARCH_RESULTS};
use crate::types::ResolvedSource;
use tracing::{debug, warn};

/// URL substrings marking a portal search-results or item-list page
const LISTING_MARKERS: &[&str] = &["searchTotal.do", "itemOrganList.do"];

/// Decides whether a URL is a listing page rather than a report
pub trait ListingDetector: Send + Sync {
    /// True if `url` should be scraped for report-detail links
    fn is_listing(&self, url: &str) -> bool;
}

impl<T> ListingDetector for T
where
    T: Fn(&str) -> bool + Send + Sync,
{
    fn is_listing(&self, url: &str) -> bool {
        self(url)
    }
}

/// Substring-based detector for the public-disclosure portal
#[derive(Debug, Clone)]
pub struct PortalListingDetector {
    markers: Vec<String>,
}

impl Default for PortalListingDetector {
    fn default() -> Self {
        Self::new(LISTING_MARKERS.iter().copied())
    }
}

impl PortalListingDetector {
    /// Create a detector matching any of `markers`
    pub fn new<I, M>(markers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }
}

impl ListingDetector for PortalListingDetector {
    fn is_listing(&self, url: &str) -> bool {
        self.markers.iter().any(|marker| url.contains(marker.as_str()))
    }
}

/// Builder for [`SourceResolver`]
pub struct ResolverBuilder<F, S> {
    fetcher: F,
    search: S,
    listing_detector: Box<dyn ListingDetector>,
    max_listing_links: usize,
    max_search_results: usize,
}

impl<F: Fetcher, S: SearchProvider> ResolverBuilder<F, S> {
    /// Create a builder with portal defaults
    pub fn new(fetcher: F, search: S) -> Self {
        Self {
            fetcher,
            search,
            listing_detector: Box::new(PortalListingDetector::default()),
            max_listing_links: MAX_REPORT_LINKS,
            max_search_results: MAX_SEARCH_RESULTS,
        }
    }

    /// Replace the listing-page predicate
    pub fn listing_detector(mut self, detector: impl ListingDetector + 'static) -> Self {
        self.listing_detector = Box::new(detector);
        self
    }

    /// Cap on report-detail candidates taken from a listing page
    pub fn max_listing_links(mut self, max: usize) -> Self {
        self.max_listing_links = max;
        self
    }

    /// Cap on search results tried
    pub fn max_search_results(mut self, max: usize) -> Self {
        self.max_search_results = max;
        self
    }

    /// Build the resolver
    pub fn build(self) -> SourceResolver<F, S> {
        SourceResolver {
            fetcher: self.fetcher,
            search: self.search,
            listing_detector: self.listing_detector,
            max_listing_links: self.max_listing_links,
            max_search_results: self.max_search_results,
        }
    }
}

/// Locates one usable report for a primary URL and fallback query
///
/// Stateless apart from network I/O; a single resolver can serve
/// concurrent calls.
pub struct SourceResolver<F, S> {
    fetcher: F,
    search: S,
    listing_detector: Box<dyn ListingDetector>,
    max_listing_links: usize,
    max_search_results: usize,
}

impl<F: Fetcher, S: SearchProvider> SourceResolver<F, S> {
    /// Create a resolver with portal defaults
    pub fn new(fetcher: F, search: S) -> Self {
        ResolverBuilder::new(fetcher, search).build()
    }

    /// Create a resolver builder
    pub fn builder(fetcher: F, search: S) -> ResolverBuilder<F, S> {
        ResolverBuilder::new(fetcher, search)
    }

    /// Fetcher used for every page request
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// True if `url` is treated as a listing page
    pub fn is_listing(&self, url: &str) -> bool {
        self.listing_detector.is_listing(url)
    }

    /// Report-detail candidates of a listing page
    ///
    /// Empty when `url` is not a listing or the listing cannot be fetched.
    pub async fn listing_candidates(&self, url: &str) -> Vec<String> {
        if !self.is_listing(url) {
            return Vec::new();
        }

        match self.fetcher.fetch_text(url).await {
            Ok(markup) => {
                let candidates = extract_report_links(url, &markup, self.max_listing_links);
                debug!(url = %url, candidates = candidates.len(), "Listing candidates extracted");
                candidates
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Listing fetch failed");
                Vec::new()
            }
        }
    }

    /// Resolve a report, starting with listing detection on `primary_url`
    pub async fn resolve(
        &self,
        primary_url: &str,
        fallback_query: &str,
    ) -> Result<ResolvedSource, ResolveError> {
        if primary_url.trim().is_empty() {
            return Err(ResolveError::MissingUrl);
        }

        let candidates = self.listing_candidates(primary_url).await;
        self.resolve_with_candidates(primary_url, &candidates, fallback_query)
            .await
    }

    /// Resolve a report using listing candidates the caller already extracted
    ///
    /// Equivalent to [`resolve`](Self::resolve) without re-fetching the
    /// listing page. Pass an empty slice for non-listing URLs.
    pub async fn resolve_with_candidates(
        &self,
        primary_url: &str,
        candidates: &[String],
        fallback_query: &str,
    ) -> Result<ResolvedSource, ResolveError> {
        if primary_url.trim().is_empty() {
            return Err(ResolveError::MissingUrl);
        }

        for candidate in candidates {
            if let Some(text) = self.fetch_report_text(candidate).await {
                debug!(candidate = %candidate, "Resolved from listing candidate");
                return Ok(ResolvedSource {
                    url: candidate.clone(),
                    text,
                    is_fallback: false,
                });
            }
        }

        self.resolve_direct_or_search(primary_url, fallback_query)
            .await
    }

    /// Resolve a specific report URL chosen from a listing
    ///
    /// Skips listing detection: the URL is fetched directly, then the web
    /// search fallback applies.
    pub async fn resolve_selected(
        &self,
        url: &str,
        fallback_query: &str,
    ) -> Result<ResolvedSource, ResolveError> {
        if url.trim().is_empty() {
            return Err(ResolveError::MissingUrl);
        }
        self.resolve_direct_or_search(url, fallback_query).await
    }

    /// Document-download links found on a resolved report page
    ///
    /// Empty when the page cannot be fetched.
    pub async fn document_links(&self, page_url: &str) -> Vec<String> {
        match self.fetcher.fetch_text(page_url).await {
            Ok(markup) => extract_document_links(page_url, &markup, MAX_DOCUMENT_LINKS),
            Err(e) => {
                debug!(url = %page_url, error = %e, "Document link scan failed");
                Vec::new()
            }
        }
    }

    async fn resolve_direct_or_search(
        &self,
        url: &str,
        fallback_query: &str,
    ) -> Result<ResolvedSource, ResolveError> {
        if let Some(text) = self.fetch_report_text(url).await {
            debug!(url = %url, "Resolved from direct fetch");
            return Ok(ResolvedSource {
                url: url.to_string(),
                text,
                is_fallback: false,
            });
        }

        let not_found = || ResolveError::NotFound {
            url: url.to_string(),
        };

        if fallback_query.trim().is_empty() {
            warn!(url = %url, "No usable report and no fallback query");
            return Err(not_found());
        }

        let results = match self
            .search
            .search(fallback_query, self.max_search_results)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(
                    provider = self.search.name(),
                    query = %fallback_query,
                    error = %e,
                    "Search fallback failed"
                );
                return Err(not_found());
            }
        };

        for candidate in &results {
            if let Some(text) = self.fetch_report_text(candidate).await {
                debug!(candidate = %candidate, "Resolved from search fallback");
                return Ok(ResolvedSource {
                    url: candidate.clone(),
                    text,
                    is_fallback: true,
                });
            }
        }

        warn!(url = %url, searched = results.len(), "No usable report found");
        Err(not_found())
    }

    /// Fetch a page and apply the text gate; any failure means "try the next one"
    async fn fetch_report_text(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch_text(url).await {
            Ok(markup) => {
                let text = extract_text(&markup);
                if text.is_none() {
                    debug!(url = %url, "Page text below report threshold");
                }
                text
            }
            Err(e) => {
                debug!(fetcher = self.fetcher.name(), url = %url, error = %e, "Candidate fetch failed");
                None
            }
        }
    }
}
