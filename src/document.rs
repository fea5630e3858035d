//! Thin query layer over `scraper` used by every extraction strategy.

use scraper::html::Select;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::ExtractError;

/// A fetched page, parsed once and owned by a single extraction
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    /// Lazy sequence of elements matching `selector`, in document order
    pub fn matches<'a, 'b>(&'a self, selector: &'b Selector) -> Matches<'a, 'b> {
        Matches {
            document: &self.document,
            selector,
        }
    }
}

/// Elements of a document matched by a compiled selector.
///
/// Nothing is evaluated until iteration starts, and every call to
/// [`Matches::iter`] restarts from the top of the document.
#[derive(Clone, Copy)]
pub struct Matches<'a, 'b> {
    document: &'a Html,
    selector: &'b Selector,
}

impl<'a, 'b> Matches<'a, 'b> {
    pub fn iter(&self) -> Select<'a, 'b> {
        self.document.select(self.selector)
    }

    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

impl<'a, 'b> IntoIterator for Matches<'a, 'b> {
    type Item = ElementRef<'a>;
    type IntoIter = Select<'a, 'b>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse a CSS selector, keeping the offending text in the error
pub fn compile_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

pub fn compile_selectors(selectors: &[String]) -> Result<Vec<Selector>, ExtractError> {
    selectors.iter().map(|s| compile_selector(s)).collect()
}

/// Compile a list of selectors into one group that matches in document order
pub fn compile_selector_group(selectors: &[String]) -> Result<Selector, ExtractError> {
    compile_selector(&selectors.join(", "))
}

/// Concatenated text of an element, leaving out script and style contents
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    collect_text(element, &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) if matches!(e.name(), "script" | "style" | "noscript") => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Trimmed text with whitespace runs collapsed to single spaces
pub fn clean_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element_text(element))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `element` is `ancestor` or sits somewhere below it
pub fn is_within(element: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    element.id() == ancestor.id() || element.ancestors().any(|node| node.id() == ancestor.id())
}

/// The next sibling that is an element, skipping text and comments
pub fn next_element_sibling<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

pub fn parent_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Elements that come after `element` in document order, excluding its own subtree
pub fn elements_after<'a>(
    document: &'a Html,
    element: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .skip_while(move |candidate| candidate.id() != element.id())
        .filter(move |candidate| !is_within(*candidate, element))
}

/// First run of ASCII digits in `text`
pub fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
