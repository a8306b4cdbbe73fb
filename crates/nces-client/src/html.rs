use nces_core::error::AppError;
use nces_core::traits::{DocumentParser, QueryableDocument, Sibling, TextMatch};
use scraper::{ElementRef, Html, Node, Selector};

/// Parses markup with the html5ever-based `scraper` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl DocumentParser for HtmlParser {
    type Document = HtmlDocument;

    fn parse(&self, markup: &str) -> Result<HtmlDocument, AppError> {
        Ok(HtmlDocument::parse(markup))
    }
}

/// A parsed page. Parsing is lenient, so malformed markup never fails.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Every element in document order.
    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }
}

fn compile(selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector).map_err(|e| AppError::SelectorError(format!("{selector}: {e}")))
}

fn has_tag(el: ElementRef<'_>, tag: &str) -> bool {
    el.value().name().eq_ignore_ascii_case(tag)
}

impl QueryableDocument for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, AppError> {
        let selector = compile(selector)?;
        Ok(self.html.select(&selector).collect())
    }

    fn select_in<'a>(
        &'a self,
        scope: ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, AppError> {
        let selector = compile(selector)?;
        Ok(scope
            .select(&selector)
            .filter(|el| el.id() != scope.id())
            .collect())
    }

    fn find_by_text(&self, tag: Option<&str>, pattern: TextMatch<'_>) -> Option<ElementRef<'_>> {
        match tag {
            Some(tag) => self
                .elements()
                .find(|&el| has_tag(el, tag) && pattern.matches(&el.text().collect::<String>())),
            None => self.html.tree.root().descendants().find_map(|node| {
                let text = node.value().as_text()?;
                if pattern.matches(text) {
                    node.parent().and_then(ElementRef::wrap)
                } else {
                    None
                }
            }),
        }
    }

    fn find_next<'a>(
        &'a self,
        from: ElementRef<'a>,
        tag: &str,
        attr: Option<(&str, &str)>,
    ) -> Option<ElementRef<'a>> {
        self.html
            .tree
            .root()
            .descendants()
            .skip_while(|node| node.id() != from.id())
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|&el| {
                has_tag(el, tag)
                    && attr.is_none_or(|(name, value)| el.value().attr(name) == Some(value))
            })
    }

    fn find_next_text<'a>(
        &'a self,
        from: ElementRef<'a>,
        pattern: TextMatch<'_>,
    ) -> Option<String> {
        self.html
            .tree
            .root()
            .descendants()
            .skip_while(|node| node.id() != from.id())
            .skip(1)
            .filter_map(|node| node.value().as_text())
            .find(|text| pattern.matches(text))
            .map(|text| text.trim().to_string())
    }

    fn closest<'a>(&'a self, node: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
        std::iter::once(node)
            .chain(node.ancestors().filter_map(ElementRef::wrap))
            .find(|&el| tags.iter().any(|tag| has_tag(el, tag)))
    }

    fn next_siblings<'a>(&'a self, node: ElementRef<'a>) -> Vec<Sibling<ElementRef<'a>>> {
        node.next_siblings()
            .filter_map(|sibling| match sibling.value() {
                Node::Text(text) => {
                    let text = text.trim();
                    (!text.is_empty()).then(|| Sibling::Text(text.to_string()))
                }
                Node::Element(el) => Some(Sibling::Element {
                    tag: el.name().to_ascii_lowercase(),
                    node: ElementRef::wrap(sibling)?,
                }),
                _ => None,
            })
            .collect()
    }

    fn attr<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<String> {
        node.value().attr(name).map(str::to_string)
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect::<String>().trim().to_string()
    }

    fn strings<'a>(&'a self, node: ElementRef<'a>) -> Vec<String> {
        node.text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn own_strings<'a>(&'a self, node: ElementRef<'a>) -> Vec<String> {
        node.children()
            .filter_map(|child| child.value().as_text())
            .map(|text| text.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
