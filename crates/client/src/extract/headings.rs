//! Document title and heading outline.

use serde::{Deserialize, Serialize};

use crate::dom::{Dom, element_text};

/// `h1`, `h2` and `h3` texts in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

/// Trimmed text of the first `<title>`, or an empty string.
pub fn extract_title(dom: &Dom) -> String {
    dom.select("title")
        .first()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Collect every `h1`, `h2` and `h3`, whitespace-collapsed, empties dropped.
pub fn extract_headings(dom: &Dom) -> Headings {
    Headings { h1: heading_texts(dom, "h1"), h2: heading_texts(dom, "h2"), h3: heading_texts(dom, "h3") }
}

fn heading_texts(dom: &Dom, tag: &str) -> Vec<String> {
    dom.select(tag)
        .iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}
