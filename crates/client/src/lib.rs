//! Client code for lookout.
//!
//! This crate provides the HTTP fetch pipeline, page extraction, and the
//! DuckDuckGo results parser used by the server.

pub mod dom;
pub mod extract;
pub mod fetch;
pub mod search;
pub mod throttle;

pub use extract::{
    Extractor, Headings, LectitoExtractor, LinkTuple, PageExtract, PageOptions, ReadableArticle, ScoredLink,
    extract_page, extract_page_with,
};

pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use search::{DuckDuckGoClient, SearchError, SearchRequest, SearchResult};
pub use throttle::{RateLimiter, Throttle};
