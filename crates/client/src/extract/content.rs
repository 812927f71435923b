//! Main-content text with search-term focusing.
//!
//! Readability output is preferred when it yields more than
//! [`MIN_READABLE_CHARS`] characters. Otherwise known chrome (scripts,
//! navigation, sidebars, comment threads...) is stripped from the DOM and
//! the remaining `<body>` text is used.
//!
//! When search terms are given and the text is longer than the limit, only
//! windows around the matches are kept, joined by ` ... `.

use regex::RegexBuilder;
use url::Url;

use super::Extractor;
use crate::dom::{Dom, collapse_whitespace};

/// Readable text must be longer than this to beat the fallback.
pub const MIN_READABLE_CHARS: usize = 200;

/// Separator between merged match windows.
const WINDOW_SEPARATOR: &str = " ... ";

/// Elements removed before taking the fallback body text.
const BOILERPLATE_SELECTORS: &[&str] = &[
    "script, style, noscript, iframe, svg, canvas, template",
    "header, footer, nav, aside",
    r#"[role="navigation"], [role="banner"], [role="contentinfo"]"#,
    r#"[role="complementary"], [role="menu"], [role="menubar"]"#,
    r#"[class*="sidebar"], [class*="menu"], [class*="nav-"], [class*="-nav"], [class*="footer"], [class*="header"]"#,
    r#"[class*="advertisement"], [class*="social"], [class*="share"], [class*="comment"], [class*="related"], [class*="breadcrumb"]"#,
    r#"[id*="sidebar"], [id*="menu"], [id*="nav"], [id*="footer"], [id*="header"], [id*="advertisement"], [id*="comments"]"#,
];

/// Options for one content extraction. Callers resolve all defaults.
#[derive(Debug, Clone, Default)]
pub struct ContentOptions {
    /// Maximum characters returned.
    pub max_length: usize,
    /// Terms to focus the returned text on.
    pub search_terms: Vec<String>,
}

/// Where the page text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Readable { text: String },
    Fallback { text: String },
}

impl ContentSource {
    pub fn text(&self) -> &str {
        match self {
            ContentSource::Readable { text } | ContentSource::Fallback { text } => text,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, ContentSource::Readable { .. })
    }
}

/// Whether readable text is long enough to be used.
pub fn is_substantial(text: &str) -> bool {
    text.chars().count() > MIN_READABLE_CHARS
}

/// Choose between readability output and the boilerplate-stripped body.
///
/// Mutates `dom` only when falling back.
pub fn select_source(html: &str, url: &Url, dom: &mut Dom, extractor: &dyn Extractor) -> ContentSource {
    if let Some(article) = extractor.readable(html, url) {
        let text = collapse_whitespace(&article.text);
        if is_substantial(&text) {
            return ContentSource::Readable { text };
        }
        tracing::debug!("readable text too short ({} chars), using body fallback", text.chars().count());
    }

    let removed = strip_boilerplate(dom);
    tracing::debug!("stripped {} boilerplate elements", removed);

    ContentSource::Fallback { text: dom.first_text("body").unwrap_or_default() }
}

/// Remove navigation, chrome and non-visible elements. Returns how many were removed.
pub fn strip_boilerplate(dom: &mut Dom) -> usize {
    BOILERPLATE_SELECTORS.iter().map(|sel| dom.remove(sel)).sum()
}

/// Extract the page's main text, at most `options.max_length` characters.
pub fn extract_text_content(
    html: &str, url: &Url, dom: &mut Dom, options: &ContentOptions, extractor: &dyn Extractor,
) -> String {
    let source = select_source(html, url, dom, extractor);
    focus_text(source.text(), &options.search_terms, options.max_length)
}

/// Cut `text` down to `max_length` characters, keeping the neighbourhood of
/// search-term matches when there are any.
pub fn focus_text(text: &str, search_terms: &[String], max_length: usize) -> String {
    let terms: Vec<&str> = search_terms
        .iter()
        .map(String::as_str)
        .filter(|t| !t.trim().is_empty())
        .collect();

    let total = text.chars().count();
    if terms.is_empty() || max_length >= total {
        return truncate_chars(text, max_length);
    }

    let padding = max_length / (terms.len() * 2);
    let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let to_char = |byte: usize| char_starts.partition_point(|&b| b < byte);

    let mut windows: Vec<(usize, usize)> = Vec::new();
    for term in &terms {
        let Ok(re) = RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() else {
            continue;
        };
        for m in re.find_iter(text) {
            let start = to_char(m.start()).saturating_sub(padding);
            let end = (to_char(m.end()) + padding).min(total);
            windows.push((start, end));
        }
    }

    if windows.is_empty() {
        return truncate_chars(text, max_length);
    }

    windows.sort_by_key(|&(start, _)| start);

    let mut merged = Vec::new();
    let (mut current_start, mut current_end) = windows[0];
    for &(start, end) in &windows[1..] {
        if start <= current_end {
            current_end = current_end.max(end);
        } else {
            merged.push((current_start, current_end));
            current_start = start;
            current_end = end;
        }
    }
    merged.push((current_start, current_end));

    let chars: Vec<char> = text.chars().collect();
    let joined = merged
        .iter()
        .map(|&(start, end)| chars[start..end].iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(WINDOW_SEPARATOR);

    truncate_chars(&joined, max_length)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
