//! Query helpers over a parsed checklist page.
//!
//! The extractors only ever need a handful of primitives: find the first or
//! all elements matching a selector, filter those by an attribute or text
//! pattern, read normalized text, and step to a sibling, parent or child.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// A parsed checklist page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(contents: &str) -> Self {
        Self {
            html: Html::parse_document(contents),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

/// Compile a selector known at build time.
#[allow(clippy::expect_used)] // Only called with literal selectors
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Compile a regex known at build time.
#[allow(clippy::expect_used)] // Only called with literal patterns
pub(crate) fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid regex")
}

pub fn find<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

pub fn find_all<'a>(node: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    node.select(selector).collect()
}

/// First element matching `selector` whose `attr` value matches `pattern`.
pub fn find_by_attr<'a>(
    node: ElementRef<'a>,
    selector: &Selector,
    attr: &str,
    pattern: &Regex,
) -> Option<ElementRef<'a>> {
    node.select(selector)
        .find(|el| el.value().attr(attr).is_some_and(|v| pattern.is_match(v)))
}

/// All elements matching `selector` whose `attr` value matches `pattern`.
pub fn find_all_by_attr<'a>(
    node: ElementRef<'a>,
    selector: &Selector,
    attr: &str,
    pattern: &Regex,
) -> Vec<ElementRef<'a>> {
    node.select(selector)
        .filter(|el| el.value().attr(attr).is_some_and(|v| pattern.is_match(v)))
        .collect()
}

/// First element matching `selector` whose normalized text matches `pattern`.
pub fn find_by_text<'a>(
    node: ElementRef<'a>,
    selector: &Selector,
    pattern: &Regex,
) -> Option<ElementRef<'a>> {
    node.select(selector).find(|el| pattern.is_match(&text(*el)))
}

/// Text content with runs of whitespace collapsed and ends trimmed.
pub fn text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

pub fn next_sibling_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div id="outer">
            <span title="Duration: 1 hour">  one
                hour </span>
            <span>Observers:</span>
            text between
            <span>3</span>
            <p>last</p>
        </div>
    "#;

    #[test]
    fn test_text_collapses_whitespace() {
        let doc = Document::parse(PAGE);
        let span = find(doc.root(), &selector("span[title]")).unwrap();
        assert_eq!(text(span), "one hour");
    }

    #[test]
    fn test_find_by_attr_and_text() {
        let doc = Document::parse(PAGE);
        let spans = selector("span");
        let titled = find_by_attr(doc.root(), &spans, "title", &pattern("(?i)duration"));
        assert!(titled.is_some());
        assert!(find_by_attr(doc.root(), &spans, "title", &pattern("(?i)distance")).is_none());

        let label = find_by_text(doc.root(), &spans, &pattern(r"(?i)^observers?:?$")).unwrap();
        let value = next_sibling_element(label).unwrap();
        assert_eq!(text(value), "3");
    }

    #[test]
    fn test_parent_and_children() {
        let doc = Document::parse(PAGE);
        let p = find(doc.root(), &selector("p")).unwrap();
        let outer = parent_element(p).unwrap();
        assert_eq!(attr(outer, "id"), Some("outer"));
        assert_eq!(child_elements(outer).count(), 4);
        assert_eq!(find_all(outer, &selector("span")).len(), 3);
    }
}
