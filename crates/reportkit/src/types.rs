//! Core types for ReportKit

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A successfully acquired report
///
/// `text` is normalized and always at least [`MIN_REPORT_CHARS`](crate::MIN_REPORT_CHARS)
/// characters long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSource {
    /// URL the text was extracted from
    pub url: String,

    /// Normalized report text
    pub text: String,

    /// True when the report was found via web search instead of the portal
    pub is_fallback: bool,
}

impl ResolvedSource {
    /// Short provenance label for display
    pub fn provenance(&self) -> &'static str {
        if self.is_fallback {
            "search-fallback"
        } else {
            "portal"
        }
    }

    /// Number of characters in the report text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Raw bytes of a downloadable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Document URL
    pub url: String,

    /// Response body
    pub bytes: Bytes,

    /// Media type without parameters (defaults to `application/pdf`)
    pub content_type: String,

    /// Filename from Content-Disposition or the URL path
    pub filename: Option<String>,
}

impl RawDocument {
    /// Filename to save the document under
    ///
    /// `index` is the 1-based position of the link on its page and is only
    /// used when neither the server nor the URL suggests a name.
    pub fn file_name_or_default(&self, index: usize) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("report_{}.pdf", index))
    }
}
