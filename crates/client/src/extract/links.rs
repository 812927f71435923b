//! Link harvesting and relevance ranking.
//!
//! Every `a[href]` is visited in document order. Root-relative hrefs are
//! resolved against the page URL, absolute http(s) hrefs are kept verbatim,
//! and everything else (`javascript:`, `mailto:`, fragments, bare relative
//! paths) is dropped. Candidates are then scored once over the whole set:
//!
//! ```text
//! ratio   = 1 / max(1, digits(url))
//! penalty = 20 * position / total
//! score   = ratio * (100 - (len(label) + len(url) + penalty))
//!         + (1 - ratio) * words(label)
//!         + 1000 per search term found in the label
//! ```
//!
//! Scores only order links within one page.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::dom::{Dom, attr, element_text};

/// Flat bonus per matching search term; larger than any base score spread.
const TERM_BOOST: f64 = 1000.0;

/// A harvested anchor before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLink {
    /// Index among all `a[href]` elements of the page, including skipped ones.
    pub position: usize,
    /// Collapsed anchor text
    pub label: String,
    /// Absolute URL
    pub url: String,
}

/// A link with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLink {
    pub label: String,
    pub url: String,
    pub score: f64,
}

/// `(label, url)` as returned to callers.
pub type LinkTuple = (String, String);

/// Harvest deduplicated, labelled links from a document.
pub fn collect_links(dom: &Dom, base_url: &Url) -> Vec<RawLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for (position, element) in dom.select("a[href]").iter().enumerate() {
        let Some(href) = attr(element, "href") else {
            continue;
        };

        let Some(url) = resolve_href(href, base_url) else {
            continue;
        };

        if !seen.insert(url.clone()) {
            continue;
        }

        let label = element_text(element);
        if label.is_empty() {
            continue;
        }

        links.push(RawLink { position, label, url });
    }

    links
}

/// Resolve an href following the page-link policy, or `None` to skip it.
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    if href.starts_with('/') {
        return base_url.join(href).ok().map(String::from);
    }

    if href.starts_with("http") {
        return match Url::parse(href) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Some(href.to_string()),
            _ => None,
        };
    }

    None
}

/// Score every link relative to the others in the same set.
pub fn score_links(links: Vec<RawLink>, search_terms: &[String]) -> Vec<ScoredLink> {
    let total = links.len() as f64;
    let terms: Vec<String> = search_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    links
        .into_iter()
        .map(|RawLink { position, label, url }| {
            let digits = url.chars().filter(|c| c.is_ascii_digit()).count();
            let ratio = 1.0 / digits.max(1) as f64;
            let position_penalty = 20.0 * position as f64 / total;
            let length = (label.chars().count() + url.chars().count()) as f64;
            let words = label.split_whitespace().count() as f64;

            let mut score = ratio * (100.0 - (length + position_penalty)) + (1.0 - ratio) * words;

            let lower = label.to_lowercase();
            for term in &terms {
                if lower.contains(term.as_str()) {
                    score += TERM_BOOST;
                }
            }

            ScoredLink { label, url, score }
        })
        .collect()
}

/// Extract, score and rank links, keeping scores for diagnostics.
///
/// Ties keep document order.
pub fn extract_links_with_scores(
    dom: &Dom, base_url: &Url, max_links: usize, search_terms: &[String],
) -> Vec<ScoredLink> {
    if max_links == 0 {
        return Vec::new();
    }

    let raw = collect_links(dom, base_url);
    if raw.is_empty() {
        return Vec::new();
    }

    let mut scored = score_links(raw, search_terms);
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(max_links);
    scored
}

/// Extract the top `max_links` links as `(label, url)` pairs.
pub fn extract_links(dom: &Dom, base_url: &Url, max_links: usize, search_terms: &[String]) -> Vec<LinkTuple> {
    extract_links_with_scores(dom, base_url, max_links, search_terms)
        .into_iter()
        .map(|link| (link.label, link.url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://ex.com").unwrap()
    }

    #[test]
    fn test_extract_links_scenario() {
        let html = r#"<html><head><title>Example</title></head><body><h1>Hi</h1><a href="/x">Link A</a><a href="/x">Link A dup</a></body></html>"#;

        let dom = Dom::parse(html);
        let links = extract_links(&dom, &base(), 5, &[]);

        assert_eq!(links, vec![("Link A".to_string(), "https://ex.com/x".to_string())]);
    }

    #[test]
    fn test_extract_links_no_links() {
        let html = r#"
            <html>
                <body>
                    <p>No links here</p>
                </body>
            </html>
        "#;

        let dom = Dom::parse(html);
        assert!(extract_links(&dom, &base(), 10, &[]).is_empty());
        assert!(extract_links(&dom, &base(), 0, &[]).is_empty());
    }

    #[test]
    fn test_extract_links_zero_cap() {
        let dom = Dom::parse(r#"<a href="/a">A</a><a href="/b">B</a>"#);
        assert!(extract_links(&dom, &base(), 0, &[]).is_empty());
    }

    #[test]
    fn test_extract_links_cap() {
        let html = (0..10)
            .map(|i| format!(r#"<a href="/page-{i}">Page {i}</a>"#))
            .collect::<String>();

        let dom = Dom::parse(&html);
        assert_eq!(extract_links(&dom, &base(), 3, &[]).len(), 3);
        assert_eq!(extract_links(&dom, &base(), 50, &[]).len(), 10);
    }

    #[test]
    fn test_extract_links_skips_unsupported_hrefs() {
        let html = r##"
            <html>
                <body>
                    <a href="javascript:void(0)">Script</a>
                    <a href="mailto:a@ex.com">Mail</a>
                    <a href="#section">Section</a>
                    <a href="contact">Contact</a>
                    <a href="ftp://ex.com/file">Ftp</a>
                    <a href="https://other.com/page">Other</a>
                    <a href="http://[bad">Broken</a>
                </body>
            </html>
        "##;

        let dom = Dom::parse(html);
        let links = extract_links(&dom, &base(), 10, &[]);

        assert_eq!(links, vec![("Other".to_string(), "https://other.com/page".to_string())]);
    }

    #[test]
    fn test_extract_links_absolute_kept_verbatim() {
        let dom = Dom::parse(r#"<a href="https://other.com">Other</a>"#);
        let links = extract_links(&dom, &base(), 10, &[]);
        assert_eq!(links[0].1, "https://other.com");
    }

    #[test]
    fn test_extract_links_duplicate_keeps_first_label() {
        let html = r#"
            <a href="https://ex.com/a">First</a>
            <a href="/b">Other</a>
            <a href="https://ex.com/a">Second</a>
        "#;

        let dom = Dom::parse(html);
        let links = extract_links(&dom, &base(), 10, &[]);

        assert_eq!(links.len(), 2);
        assert!(links.contains(&("First".to_string(), "https://ex.com/a".to_string())));
        assert!(!links.iter().any(|(label, _)| label == "Second"));
    }

    #[test]
    fn test_extract_links_empty_label_skipped() {
        let html = r#"
            <a href="/img"><img src="x.png"></a>
            <a href="/text">   </a>
            <a href="/nested"><span>Nested</span> <b>label</b></a>
        "#;

        let dom = Dom::parse(html);
        let links = extract_links(&dom, &base(), 10, &[]);

        assert_eq!(links, vec![("Nested label".to_string(), "https://ex.com/nested".to_string())]);
    }

    #[test]
    fn test_score_values() {
        let html = r#"
            <a href="/page">Page</a>
            <a href="/2024/01/15/story">Story</a>
        "#;

        let dom = Dom::parse(html);
        let links = extract_links_with_scores(&dom, &base(), 10, &[]);

        assert_eq!(links[0].url, "https://ex.com/page");
        assert_eq!(links[0].score, 77.0);
        assert_eq!(links[1].url, "https://ex.com/2024/01/15/story");
        assert!((links[1].score - 7.625).abs() < 1e-9);
    }

    #[test]
    fn test_position_counts_skipped_anchors() {
        let html = r#"
            <a href="javascript:void(0)">Script</a>
            <a href="/page">Page</a>
        "#;

        let dom = Dom::parse(html);
        let links = extract_links_with_scores(&dom, &base(), 10, &[]);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].score, 57.0);
    }

    #[test]
    fn test_search_term_boost_outranks_everything() {
        let html = r#"
            <a href="/a">Home</a>
            <a href="/b">About</a>
            <a href="/archive/2019/03/12/1234567">A rather long archived article about Rust ownership rules</a>
            <a href="/c">Blog</a>
        "#;

        let dom = Dom::parse(html);
        let terms = vec!["RUST".to_string()];
        let links = extract_links(&dom, &base(), 10, &terms);

        assert_eq!(links[0].0, "A rather long archived article about Rust ownership rules");

        let unboosted = extract_links(&dom, &base(), 10, &[]);
        assert_ne!(unboosted[0].0, links[0].0);
    }

    #[test]
    fn test_boost_applies_per_matching_term() {
        let links = vec![RawLink { position: 0, label: "Rust async book".into(), url: "https://ex.com/r".into() }];
        let one = score_links(links.clone(), &["rust".to_string()]);
        let two = score_links(links, &["rust".to_string(), "ASYNC".to_string(), "python".to_string()]);
        assert_eq!(two[0].score - one[0].score, 1000.0);
    }

    #[test]
    fn test_blank_terms_ignored() {
        let links = vec![RawLink { position: 0, label: "Home".into(), url: "https://ex.com/".into() }];
        let plain = score_links(links.clone(), &[]);
        let blank = score_links(links, &["".to_string(), "  ".to_string()]);
        assert_eq!(plain[0].score, blank[0].score);
    }

    #[test]
    fn test_ties_keep_document_order() {
        // Both score 66: the longer label sits at position 0 (no penalty),
        // the shorter one at position 1 (penalty 10).
        let html = r#"
            <a href="/pa">Alpha Alpha Alpha</a>
            <a href="/pb">Beta Be</a>
        "#;

        let dom = Dom::parse(html);
        let links = extract_links_with_scores(&dom, &base(), 10, &[]);

        assert_eq!(links[0].score, links[1].score);
        assert_eq!(links[0].label, "Alpha Alpha Alpha");
        assert_eq!(links[1].label, "Beta Be");
    }
}
