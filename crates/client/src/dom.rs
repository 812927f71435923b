//! Queryable DOM handle over a leniently parsed HTML document.
//!
//! Parsing goes through html5ever (via `scraper`), which recovers from
//! malformed or truncated markup the same way browsers do, so construction
//! never fails. Removing elements only touches the in-memory tree.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document, owned for the duration of one extraction call.
pub struct Dom {
    html: Html,
}

impl Dom {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// All elements matching `selector`, in document order.
    ///
    /// An unparseable selector matches nothing.
    pub fn select(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(sel) => self.html.select(&sel).collect(),
            Err(e) => {
                tracing::debug!("ignoring invalid selector {:?}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    /// Collapsed text of the first element matching `selector`.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        self.select(selector).first().map(element_text)
    }

    /// Detach every element matching `selector` from the tree.
    ///
    /// Returns the number of elements removed.
    pub fn remove(&mut self, selector: &str) -> usize {
        let Ok(sel) = Selector::parse(selector) else {
            tracing::debug!("ignoring invalid removal selector {:?}", selector);
            return 0;
        };

        let ids: Vec<_> = self.html.select(&sel).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }
}

/// Text of an element and all its descendants, whitespace-collapsed and trimmed.
///
/// Text nodes are concatenated without separators, so `<a>Foo<b>bar</b></a>`
/// reads as `Foobar`.
pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Descendants of `el` matching `selector`, in document order.
pub fn select_within<'a>(el: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => el.select(&sel).collect(),
        Err(e) => {
            tracing::debug!("ignoring invalid selector {:?}: {:?}", selector, e);
            Vec::new()
        }
    }
}

/// `el` itself or its nearest ancestor element satisfying `pred`.
pub fn closest<'a>(el: &ElementRef<'a>, pred: impl Fn(&ElementRef<'a>) -> bool) -> Option<ElementRef<'a>> {
    std::iter::once(*el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| pred(candidate))
}

/// Attribute value of an element.
pub fn attr<'a>(el: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Replace every whitespace run with a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c  "), "a b c");
        assert_eq!(collapse_whitespace("a\u{a0}b"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_select_document_order() {
        let dom = Dom::parse("<p>one</p><div><p>two</p></div><p>three</p>");
        let texts: Vec<_> = dom.select("p").iter().map(element_text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_element_text_concatenates_descendants() {
        let dom = Dom::parse("<a href='/x'>Foo<b>bar</b>\n  <i>baz</i></a>");
        let anchors = dom.select("a");
        assert_eq!(element_text(&anchors[0]), "Foobar baz");
    }

    #[test]
    fn test_attr() {
        let dom = Dom::parse(r#"<a href="/x" class="k">x</a><a>y</a>"#);
        let anchors = dom.select("a");
        assert_eq!(attr(&anchors[0], "href"), Some("/x"));
        assert_eq!(attr(&anchors[0], "class"), Some("k"));
        assert_eq!(attr(&anchors[1], "href"), None);
    }

    #[test]
    fn test_select_within_and_closest() {
        let dom = Dom::parse(r#"<div class="card"><p class="s">one</p><div><a href="/x">x</a></div></div><p class="s">out</p>"#);
        let anchor = dom.select("a")[0];

        let card = closest(&anchor, |el| el.value().classes().any(|c| c == "card")).unwrap();
        let texts: Vec<_> = select_within(&card, ".s").iter().map(element_text).collect();
        assert_eq!(texts, vec!["one"]);

        assert!(closest(&anchor, |el| el.value().name() == "a").is_some());
        assert!(closest(&anchor, |el| el.value().name() == "table").is_none());
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let dom = Dom::parse("<p>text</p>");
        assert!(dom.select("p[[").is_empty());
        assert_eq!(dom.first_text("::::"), None);
    }

    #[test]
    fn test_remove_detaches_matches() {
        let mut dom = Dom::parse("<body><nav>menu</nav><p>keep</p><div class='x'><p>gone</p></div></body>");
        assert_eq!(dom.remove("nav, .x"), 2);
        assert_eq!(dom.first_text("body").as_deref(), Some("keep"));
        assert!(dom.select("nav").is_empty());
    }

    #[test]
    fn test_remove_nested_matches() {
        let mut dom = Dom::parse("<body><div class='a'><div class='a'>x</div></div><p>y</p></body>");
        assert_eq!(dom.remove(".a"), 2);
        assert_eq!(dom.first_text("body").as_deref(), Some("y"));
    }

    #[test]
    fn test_malformed_html_is_recovered() {
        let dom = Dom::parse("<html><body><p>unclosed <b>bold<div>block</p>");
        assert!(dom.first_text("body").is_some_and(|t| t.contains("unclosed")));
        assert!(!dom.select("div").is_empty());
    }
}
