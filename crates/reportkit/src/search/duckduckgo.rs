//! DuckDuckGo HTML results adapter
//!
//! Uses the JavaScript-free results page; only the first page is read.

use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::search::SearchProvider;
use async_trait::async_trait;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use scraper::{Html, Selector};
use tracing::debug;

/// HTML results endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";

/// Characters left unescaped in the query string
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Search adapter scraping DuckDuckGo's HTML results
pub struct DuckDuckGoSearch<F> {
    fetcher: F,
    endpoint: String,
}

impl<F: Fetcher> DuckDuckGoSearch<F> {
    /// Create an adapter that fetches result pages through `fetcher`
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
        }
    }

    /// Override the results endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Full results-page URL for a query
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}",
            self.endpoint,
            utf8_percent_encode(query, QUERY_SAFE)
        )
    }
}

#[async_trait]
impl<F: Fetcher> SearchProvider for DuckDuckGoSearch<F> {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, FetchError> {
        let url = self.search_url(query);
        let markup = self.fetcher.fetch_text(&url).await?;
        let results = parse_results(&markup, max_results);
        debug!(query = %query, results = results.len(), "Search results parsed");
        Ok(results)
    }
}

/// Extract organic result URLs from a results page
///
/// Redirect wrappers (`//duckduckgo.com/l/?uddg=...`) are unwrapped first;
/// anything that is still not an absolute http(s) URL is skipped.
pub fn parse_results(markup: &str, max_results: usize) -> Vec<String> {
    let Ok(link_selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    let document = Html::parse_document(markup);
    document
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .map(unwrap_redirect)
        .filter(|href| href.starts_with("http"))
        .take(max_results)
        .collect()
}

/// Decode the destination of a DuckDuckGo redirect link
fn unwrap_redirect(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + "uddg=".len();
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        let encoded = &href[start..end];
        if !encoded.is_empty() {
            return percent_decode_str(encoded).decode_utf8_lossy().into_owned();
        }
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawDocument;
    use std::sync::Mutex;

    const RESULTS_PAGE: &str = r#"
        <div class="result"><a class="result__a" href="https://a.example/report">A</a></div>
        <div class="result"><a class="result__snippet" href="https://ignored.example/">s</a></div>
        <div class="result"><a class="result__a" href="/relative/path">R</a></div>
        <div class="result"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fb.example%2Fpaper%3Fid%3D1&rut=abc">B</a></div>
        <div class="result"><a class="result__a" href="http://c.example/">C</a></div>
    "#;

    #[derive(Default)]
    struct RecordingFetcher {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(RESULTS_PAGE.to_string())
        }

        async fn fetch_binary(&self, url: &str) -> Result<RawDocument, FetchError> {
            Err(FetchError::RequestError {
                url: url.to_string(),
                message: "unused".to_string(),
            })
        }
    }

    #[test]
    fn test_parse_results_filters_and_unwraps() {
        let results = parse_results(RESULTS_PAGE, 5);
        assert_eq!(
            results,
            vec![
                "https://a.example/report",
                "https://b.example/paper?id=1",
                "http://c.example/",
            ]
        );
    }

    #[test]
    fn test_parse_results_respects_max() {
        let results = parse_results(RESULTS_PAGE, 2);
        assert_eq!(
            results,
            vec!["https://a.example/report", "https://b.example/paper?id=1"]
        );
        assert!(parse_results(RESULTS_PAGE, 0).is_empty());
    }

    #[test]
    fn test_search_url_encoding() {
        let search = DuckDuckGoSearch::new(RecordingFetcher::default());
        assert_eq!(
            search.search_url("K-water 연구보고서"),
            "https://duckduckgo.com/html/?q=K-water%20%EC%97%B0%EA%B5%AC%EB%B3%B4%EA%B3%A0%EC%84%9C"
        );

        let search = search.with_endpoint("http://127.0.0.1:9/html/");
        assert_eq!(search.search_url("a&b"), "http://127.0.0.1:9/html/?q=a%26b");
    }

    #[tokio::test]
    async fn test_search_fetches_results_page() {
        let search = DuckDuckGoSearch::new(RecordingFetcher::default());
        let results = search.search("water report", 1).await.unwrap();
        assert_eq!(results, vec!["https://a.example/report"]);
        assert_eq!(
            search.fetcher.requested.lock().unwrap().as_slice(),
            ["https://duckduckgo.com/html/?q=water%20report".to_string()]
        );
    }
}
