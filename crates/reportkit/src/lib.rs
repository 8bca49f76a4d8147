//! ReportKit - research report acquisition and study assistant library
//!
//! This crate locates a usable public-sector research report and turns it
//! into plain text that can be handed to a chat model for summaries,
//! quizzes and follow-up questions.
//!
//! ## Acquisition Pipeline
//!
//! [`SourceResolver`] walks a strictly ordered fallback chain and stops at
//! the first page that yields enough readable text:
//!
//! 1. Listing page: scrape report-detail links and try each in order
//! 2. Direct fetch of the given URL
//! 3. Web search for the fallback query, trying each result in order
//!
//! Network access goes through the [`Fetcher`] and [`SearchProvider`]
//! traits, so every stage can be exercised with in-memory stubs.
//!
//! ## Study Assistant
//!
//! The [`study`] module builds summary/quiz/chat prompts over a loaded
//! report and sends them to any [`ChatModel`], such as [`OpenAiChat`].

pub mod client;
pub mod download;
mod error;
pub mod extract;
pub mod fetchers;
pub mod resolver;
pub mod search;
pub mod study;
mod types;

pub use client::FetchOptions;
pub use download::DocumentRetriever;
pub use error::{ChatError, FetchError, ResolveError};
pub use extract::{clean_text, extract_document_links, extract_report_links, extract_text};
pub use fetchers::{Fetcher, HttpFetcher};
pub use resolver::{ListingDetector, PortalListingDetector, ResolverBuilder, SourceResolver};
pub use search::{DuckDuckGoSearch, SearchProvider};
pub use study::{ChatModel, Language, Message, OpenAiChat, Role, StudySession, StudySettings};
pub use types::{RawDocument, ResolvedSource};

/// Default User-Agent string
///
/// Report portals reject requests without a browser-like identity.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Minimum normalized character count for a page to count as report content
pub const MIN_REPORT_CHARS: usize = 500;

/// Organization item list on the public-disclosure portal (research reports)
pub const PORTAL_ORGAN_LIST_URL: &str =
    "https://alio.go.kr/item/itemOrganList.do?apbaId=C0221&reportFormRootNo=B1040";

/// Total-search results page on the public-disclosure portal
pub const PORTAL_SEARCH_URL: &str = "https://www.alio.go.kr/search/searchTotal.do?word=%ED%95%9C%EA%B5%AD%EC%88%98%EC%9E%90%EC%9B%90%EA%B3%B5%EC%82%AC+%EC%97%B0%EA%B5%AC%EB%B3%B4%EA%B3%A0%EC%84%9C\
     &apbaNm=&targetList=jeonggi%2Csusi%2CinfoCenter%2Cemployment%2Cbid%2Cnotice&attachFileYn=Y&sortType=LATEST";

/// Web search query used when the portal path yields nothing
pub const DEFAULT_FALLBACK_QUERY: &str = "K-water 연구보고서 생산보고서 논문 물관리";
