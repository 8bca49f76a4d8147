//! HTML extraction utilities
//!
//! Two independent extractors work on raw markup returned by a
//! [`Fetcher`](crate::Fetcher):
//!
//! - [`extract_text`] - visible text with a minimum-length acceptance gate
//! - [`extract_report_links`] / [`extract_document_links`] - ordered,
//!   de-duplicated absolute links matching a link-shape predicate

mod links;
mod text;

pub use links::{
    extract_document_links, extract_links, extract_report_links, is_document_link,
    is_report_link, MAX_DOCUMENT_LINKS, MAX_REPORT_LINKS,
};
pub use text::{clean_text, extract_text, visible_text};
