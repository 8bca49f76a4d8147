//! Link extraction from listing and report pages

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Default cap for report-detail links taken from a listing page
pub const MAX_REPORT_LINKS: usize = 8;

/// Default cap for document-download links taken from a report page
pub const MAX_DOCUMENT_LINKS: usize = 6;

/// Path tokens identifying a portal item-detail page (case-sensitive)
const REPORT_LINK_TOKENS: &[&str] = &["itemDetail.do", "itemDetail", "itemDetailInfo"];

/// Tokens identifying a downloadable document (matched on the lowercased href)
const DOCUMENT_LINK_TOKENS: &[&str] = &[".pdf", "filedown", "download"];

/// True if `href` points at a report-detail page
pub fn is_report_link(href: &str) -> bool {
    REPORT_LINK_TOKENS.iter().any(|token| href.contains(token))
}

/// True if `href` points at a downloadable document
pub fn is_document_link(href: &str) -> bool {
    let lower = href.to_lowercase();
    DOCUMENT_LINK_TOKENS.iter().any(|token| lower.contains(token))
}

/// Extract up to `max_links` report-detail links from a listing page
pub fn extract_report_links(page_url: &str, markup: &str, max_links: usize) -> Vec<String> {
    extract_links(page_url, markup, max_links, is_report_link)
}

/// Extract up to `max_links` document-download links from a page
pub fn extract_document_links(page_url: &str, markup: &str, max_links: usize) -> Vec<String> {
    extract_links(page_url, markup, max_links, is_document_link)
}

/// Scan anchors in document order and collect absolute links matching `predicate`
///
/// Relative hrefs resolve against the page's scheme and host, not its full
/// path. Collection stops as soon as `max_links` matches are gathered, and
/// only then are duplicates removed. The cap therefore counts repeated
/// occurrences, and the result may be shorter than `max_links` even when
/// more unique matches exist further down the page.
pub fn extract_links<P>(page_url: &str, markup: &str, max_links: usize, predicate: P) -> Vec<String>
where
    P: Fn(&str) -> bool,
{
    if max_links == 0 {
        return Vec::new();
    }

    let Some(base) = origin_base(page_url) else {
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(markup);
    let mut candidates = Vec::new();

    for anchor in document.select(&anchor_selector) {
        let href = anchor.value().attr("href").unwrap_or_default();
        if predicate(href) {
            if let Ok(resolved) = base.join(href) {
                candidates.push(resolved.to_string());
            }
        }
        if candidates.len() >= max_links {
            break;
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|link| seen.insert(link.clone()));
    candidates
}

/// `scheme://host[:port]/` of a page URL
fn origin_base(page_url: &str) -> Option<Url> {
    let mut base = Url::parse(page_url).ok()?;
    if base.cannot_be_a_base() {
        return None;
    }
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    Some(base)
}
