//! Page extraction: title, headings, ranked links and main content.
//!
//! ### Readability
//! - Uses Lectito's extraction pipeline (Readability.js-inspired) behind the
//!   [`Extractor`] trait so the engine can be swapped or stubbed.
//! - A failing or thin readability pass is never an error; the content
//!   engine falls back to boilerplate-stripped body text.
//!
//! ### One parse per page
//! - [`extract_page`] parses the HTML once. Title, headings and links read
//!   the tree first; content extraction runs last because its fallback
//!   removes elements from the tree.

pub mod content;
pub mod headings;
pub mod links;

pub use content::{ContentOptions, ContentSource, extract_text_content, focus_text};
pub use headings::{Headings, extract_headings, extract_title};
pub use links::{LinkTuple, RawLink, ScoredLink, extract_links, extract_links_with_scores};

use lectito_core::{Readability, ReadabilityConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::Dom;

/// Minimum candidate size handed to the readability pass.
pub const READABILITY_CHAR_THRESHOLD: usize = 100;

/// Article produced by a readability pass.
#[derive(Debug, Clone)]
pub struct ReadableArticle {
    /// Article title
    pub title: Option<String>,
    /// Cleaned article HTML
    pub content: String,
    /// Plain text of the article
    pub text: String,
}

/// Stable extractor trait for readable-article detection.
///
/// This allows swapping the extraction engine later without changing tool code.
pub trait Extractor: Send + Sync {
    /// Find the main article of a page, or `None` when there is none.
    fn readable(&self, html: &str, base_url: &Url) -> Option<ReadableArticle>;
}

/// Lectito-based extractor implementation.
pub struct LectitoExtractor {
    char_threshold: usize,
}

impl LectitoExtractor {
    /// Create a new Lectito extractor.
    pub fn new() -> Self {
        Self { char_threshold: READABILITY_CHAR_THRESHOLD }
    }
}

impl Default for LectitoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for LectitoExtractor {
    fn readable(&self, html: &str, base_url: &Url) -> Option<ReadableArticle> {
        let config = ReadabilityConfig::builder()
            .char_threshold(self.char_threshold)
            .build();
        let reader = Readability::with_config(config);

        match reader.parse_with_url(html, base_url.as_str()) {
            Ok(article) => {
                let text = article.to_text();
                Some(ReadableArticle { title: article.metadata.title, content: article.content, text })
            }
            Err(e) => {
                tracing::debug!("readability declined {}: {}", base_url, e);
                None
            }
        }
    }
}

/// What to pull out of a page. `0` disables links or content.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub max_links: usize,
    pub content_limit: usize,
    pub search_terms: Vec<String>,
}

/// Structured view of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExtract {
    pub title: String,
    #[serde(flatten)]
    pub headings: Headings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkTuple>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Extract a page with the default Lectito extractor.
pub fn extract_page(html: &str, url: &Url, options: &PageOptions) -> PageExtract {
    extract_page_with(html, url, options, &LectitoExtractor::new())
}

/// Extract a page with a caller-supplied readability engine.
pub fn extract_page_with(html: &str, url: &Url, options: &PageOptions, extractor: &dyn Extractor) -> PageExtract {
    let mut dom = Dom::parse(html);

    let title = extract_title(&dom);
    let headings = extract_headings(&dom);

    let links =
        (options.max_links > 0).then(|| extract_links(&dom, url, options.max_links, &options.search_terms));

    let content = if options.content_limit > 0 {
        let content_options =
            ContentOptions { max_length: options.content_limit, search_terms: options.search_terms.clone() };
        Some(extract_text_content(html, url, &mut dom, &content_options, extractor)).filter(|c| !c.is_empty())
    } else {
        None
    };

    PageExtract { title, headings, links, content }
}
