//! DuckDuckGo HTML results page parser.
//!
//! The results markup varies between page variants, so a cascade of
//! selector strategies is tried in order and the first one that yields any
//! result wins. Results from different strategies are never mixed. When all
//! of them come up empty, every anchor on the page is considered instead,
//! with stricter filtering.
//!
//! Result anchors usually point at the engine's redirector
//! (`//duckduckgo.com/l/?uddg=<encoded target>&...`); the target is decoded
//! from the `uddg` parameter. Links back to the engine itself are dropped.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::dom::{Dom, attr, closest, collapse_whitespace, element_text, select_within};
use crate::extract::LinkTuple;

const ENGINE_ORIGIN: &str = "https://duckduckgo.com";
const ENGINE_DOMAIN: &str = "duckduckgo.com";

/// Fallback anchors need at least this many label characters.
const MIN_FALLBACK_LABEL_CHARS: usize = 3;

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A named way of finding results on the page.
pub type Strategy = fn(&Dom) -> Vec<SearchResult>;

/// Selector strategies in priority order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("standard", standard_results),
    ("title", title_results),
    ("web-result", web_results),
    ("results-container", container_results),
    ("url-display", url_display_results),
];

fn standard_results(dom: &Dom) -> Vec<SearchResult> {
    results_for_selector(dom, ".result .result__a")
}

fn title_results(dom: &Dom) -> Vec<SearchResult> {
    results_for_selector(dom, ".result__title a")
}

fn web_results(dom: &Dom) -> Vec<SearchResult> {
    results_for_selector(dom, ".web-result a.result__a")
}

fn container_results(dom: &Dom) -> Vec<SearchResult> {
    results_for_selector(dom, ".results a.result__a")
}

fn url_display_results(dom: &Dom) -> Vec<SearchResult> {
    results_for_selector(dom, "a.result__url")
}

/// Parse every result on the page, in document order.
pub fn parse_results(html: &str) -> Vec<SearchResult> {
    let dom = Dom::parse(html);

    for (name, strategy) in STRATEGIES {
        let results = strategy(&dom);
        if !results.is_empty() {
            tracing::debug!("search strategy {} matched {} results", name, results.len());
            return results;
        }
    }

    let results = fallback_results(&dom);
    tracing::debug!("no result selectors matched, fallback scan found {} links", results.len());
    results
}

/// The first `page_size` results as `(title, url)` pairs.
pub fn parse_results_as_links(html: &str, page_size: usize) -> Vec<LinkTuple> {
    parse_results(html)
        .into_iter()
        .take(page_size)
        .map(|result| (result.title, result.url))
        .collect()
}

fn results_for_selector(dom: &Dom, selector: &str) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for element in dom.select(selector) {
        let Some(url) = attr(&element, "href").and_then(decode_result_url) else {
            continue;
        };

        if is_engine_link(&url) || !seen.insert(url.clone()) {
            continue;
        }

        let title = element_text(&element);
        if title.is_empty() {
            continue;
        }

        let snippet = snippet_for(&element);
        results.push(SearchResult { title, url, snippet });
    }

    results
}

fn fallback_results(dom: &Dom) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for element in dom.select("a[href]") {
        let Some(url) = attr(&element, "href").and_then(decode_result_url) else {
            continue;
        };

        if is_engine_link(&url) || url.contains("javascript:") || url.starts_with('#') {
            continue;
        }

        if !seen.insert(url.clone()) {
            continue;
        }

        let title = element_text(&element);
        if title.chars().count() < MIN_FALLBACK_LABEL_CHARS {
            continue;
        }

        results.push(SearchResult { title, url, snippet: None });
    }

    results
}

/// Target URL of a result anchor, or `None` when it has none.
///
/// Redirector links yield their decoded `uddg` target. Direct `http(s)://`
/// links are returned as written.
pub fn decode_result_url(href: &str) -> Option<String> {
    if href.contains("uddg=") {
        let base = Url::parse(ENGINE_ORIGIN).ok()?;
        let redirect = base.join(href).ok()?;
        let target = redirect
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;

        return match Url::parse(&target) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => Some(target),
            _ => None,
        };
    }

    if href.starts_with("https://") || href.starts_with("http://") {
        return Some(href.to_string());
    }

    None
}

/// Whether `url` points back at the search engine.
fn is_engine_link(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return true;
    };

    parsed
        .host_str()
        .map(|host| host.trim_end_matches('.').to_ascii_lowercase())
        .is_some_and(|host| host == ENGINE_DOMAIN || host.ends_with(&format!(".{ENGINE_DOMAIN}")))
}

fn snippet_for(anchor: &ElementRef<'_>) -> Option<String> {
    let container = closest(anchor, |el| el.value().classes().any(|c| c == "result" || c == "web-result"))?;

    let text: String = select_within(&container, ".result__snippet")
        .iter()
        .flat_map(|el| el.text())
        .collect();

    Some(collapse_whitespace(&text)).filter(|s| !s.is_empty())
}
