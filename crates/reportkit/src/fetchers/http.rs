//! Default HTTP fetcher
//!
//! Sends plain GET requests with a browser-like identity. Report portals and
//! many report hosts refuse requests carrying an empty or library user agent.

use crate::client::FetchOptions;
use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::types::RawDocument;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Content type assumed when a document response omits one
const DEFAULT_DOCUMENT_TYPE: &str = "application/pdf";

const HTML_ACCEPT: &str = "text/html, application/xhtml+xml, text/plain, */*;q=0.8";

/// HTTP fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl HttpFetcher {
    /// Create a fetcher with default options
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(FetchOptions::default())
    }

    /// Create a fetcher with custom options
    pub fn with_options(options: FetchOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(options.effective_user_agent())
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        Ok(Self { client, options })
    }

    /// Options this fetcher was built with
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        accept: &'static str,
    ) -> Result<reqwest::Response, FetchError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FetchError::InvalidUrlScheme {
                url: url.to_string(),
            });
        }

        debug!(url = %url, timeout_secs = timeout.as_secs(), "GET");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url, self.options.text_timeout, HTML_ACCEPT).await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    async fn fetch_binary(&self, url: &str) -> Result<RawDocument, FetchError> {
        let response = self.get(url, self.options.binary_timeout, "*/*").await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type)
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_string());
        let filename = extract_filename(response.headers(), url);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(RawDocument {
            url: url.to_string(),
            bytes,
            content_type,
            filename,
        })
    }
}

/// Strip parameters (`; charset=...`) from a Content-Type value
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Extract filename from Content-Disposition header or URL
fn extract_filename(headers: &HeaderMap, url: &str) -> Option<String> {
    if let Some(disposition) = headers.get(CONTENT_DISPOSITION) {
        if let Ok(value) = disposition.to_str() {
            if let Some(filename) = parse_content_disposition_filename(value) {
                return Some(filename);
            }
        }
    }

    // Fallback to the last URL path segment
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    Some(percent_decode_str(last).decode_utf8_lossy().into_owned())
}

/// Parse filename from Content-Disposition header value
///
/// Prefers the RFC 5987 `filename*=UTF-8''...` form, which portals use for
/// non-ASCII names.
fn parse_content_disposition_filename(value: &str) -> Option<String> {
    if let Some(start) = value.find("filename*=") {
        let rest = &value[start + "filename*=".len()..];
        let end = rest.find(';').unwrap_or(rest.len());
        let encoded = rest[..end].trim().trim_matches('"');
        let encoded = encoded
            .split_once("''")
            .map(|(_, name)| name)
            .unwrap_or(encoded);
        let decoded = percent_decode_str(encoded).decode_utf8_lossy();
        if !decoded.is_empty() {
            return Some(decoded.into_owned());
        }
    }

    let patterns = ["filename=\"", "filename="];
    for pattern in patterns {
        if let Some(start) = value.find(pattern) {
            let rest = &value[start + pattern.len()..];
            if pattern.ends_with('"') {
                // Quoted
                if let Some(end) = rest.find('"') {
                    return Some(rest[..end].to_string());
                }
            } else {
                // Unquoted - take until space or semicolon
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == ';')
                    .unwrap_or(rest.len());
                let filename = rest[..end].trim_matches('"');
                if !filename.is_empty() {
                    return Some(filename.to_string());
                }
            }
        }
    }
    None
}
