use std::future::Future;

use crate::error::AppError;

/// Fetches raw HTML content from a URL.
///
/// A non-success response must surface as an error; implementations do not
/// retry.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Parses raw markup into a [`QueryableDocument`].
pub trait DocumentParser: Send + Sync + Clone {
    type Document: QueryableDocument;

    fn parse(&self, markup: &str) -> Result<Self::Document, AppError>;
}

/// How a visible text run is compared against a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch<'p> {
    /// Trimmed text equals the pattern.
    Exact(&'p str),
    /// Text contains the pattern anywhere.
    Contains(&'p str),
}

impl TextMatch<'_> {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextMatch::Exact(p) => text.trim() == *p,
            TextMatch::Contains(p) => text.contains(p),
        }
    }
}

/// A node following another under the same parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Sibling<N> {
    /// A text run, trimmed. Whitespace-only runs are skipped.
    Text(String),
    /// An element and its lower-cased tag name.
    Element { tag: String, node: N },
}

/// Label-driven lookups over a parsed document.
///
/// The resolver and the field extractors only talk to documents through
/// this trait, so the parsing engine behind it is swappable.
pub trait QueryableDocument {
    /// Handle to an element inside the document.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// All elements matching a CSS selector, in document order.
    fn select(&self, selector: &str) -> Result<Vec<Self::Node<'_>>, AppError>;

    /// Descendants of `scope` matching a CSS selector.
    fn select_in<'a>(
        &'a self,
        scope: Self::Node<'a>,
        selector: &str,
    ) -> Result<Vec<Self::Node<'a>>, AppError>;

    /// First element carrying matching visible text.
    ///
    /// With a tag name, the element's own trimmed text is compared. Without
    /// one, individual text runs are compared and the element directly
    /// holding the first matching run is returned.
    fn find_by_text(&self, tag: Option<&str>, pattern: TextMatch<'_>) -> Option<Self::Node<'_>>;

    /// First element after `from` in document order (descendants of `from`
    /// included) with the given tag and, optionally, attribute value.
    fn find_next<'a>(
        &'a self,
        from: Self::Node<'a>,
        tag: &str,
        attr: Option<(&str, &str)>,
    ) -> Option<Self::Node<'a>>;

    /// First text run after `from` in document order that matches.
    fn find_next_text<'a>(&'a self, from: Self::Node<'a>, pattern: TextMatch<'_>)
    -> Option<String>;

    /// `node` itself or its nearest ancestor whose tag is one of `tags`.
    fn closest<'a>(&'a self, node: Self::Node<'a>, tags: &[&str]) -> Option<Self::Node<'a>>;

    /// Nodes following `node` under the same parent.
    fn next_siblings<'a>(&'a self, node: Self::Node<'a>) -> Vec<Sibling<Self::Node<'a>>>;

    fn attr<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<String>;

    /// Concatenated text of the element and its descendants, trimmed.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    /// Every non-empty text run under the element, each trimmed.
    fn strings<'a>(&'a self, node: Self::Node<'a>) -> Vec<String>;

    /// Non-empty text runs that are direct children of the element, each trimmed.
    fn own_strings<'a>(&'a self, node: Self::Node<'a>) -> Vec<String>;
}
