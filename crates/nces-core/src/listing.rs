//! Candidate extraction from one page of name-search results.

use url::Url;

use crate::address::PostalAddress;
use crate::error::AppError;
use crate::models::SourceType;
use crate::query::resolve_link;
use crate::traits::{QueryableDocument, TextMatch};

/// Visible text of the pagination link on both directories.
pub const NEXT_PAGE_TEXT: &str = "Next >>";

/// Where candidate rows sit in a source's result table.
#[derive(Debug, Clone, Copy)]
struct ListingLayout {
    row_selector: &'static str,
    address_column: usize,
}

impl ListingLayout {
    fn for_source(source: SourceType) -> Self {
        match source {
            SourceType::Public => Self {
                row_selector: "tr",
                address_column: 1,
            },
            // Private results are the rows shaded green; the rest is page chrome.
            SourceType::Private => Self {
                row_selector: r#"tr[style*="background-color: #EDFFE8;"]"#,
                address_column: 1,
            },
        }
    }
}

/// One school entry on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    /// Absolute URL of the school's detail page.
    pub detail_url: String,
    /// Address cell text as printed.
    pub raw_address: String,
    pub address: PostalAddress,
}

/// Parsed contents of one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub rows: Vec<CandidateRow>,
    /// Absolute URL of the following page, if the listing continues.
    pub next_page: Option<String>,
}

/// Extract candidate rows and the next-page link from a listing document.
///
/// Rows without a detail link, without an address cell, or whose address
/// does not parse are skipped.
pub fn parse_listing<D: QueryableDocument>(
    doc: &D,
    source: SourceType,
    base: &Url,
) -> Result<ListingPage, AppError> {
    let layout = ListingLayout::for_source(source);
    let mut rows = Vec::new();

    for row in doc.select(layout.row_selector)? {
        // Layout rows wrapping a nested results table are not candidates.
        if !doc.select_in(row, "tr")?.is_empty() {
            continue;
        }
        let Some(anchor) = doc.select_in(row, "a[href]")?.into_iter().next() else {
            continue;
        };
        let cells = doc.select_in(row, "td")?;
        let Some(&cell) = cells.get(layout.address_column) else {
            continue;
        };
        let Some(href) = doc.attr(anchor, "href") else {
            continue;
        };
        let Some(detail_url) = resolve_link(base, &href) else {
            tracing::debug!(%href, "Skipping row with unusable detail link");
            continue;
        };

        let raw_address = doc.text(cell);
        match PostalAddress::parse(&raw_address) {
            Ok(address) => rows.push(CandidateRow {
                detail_url: detail_url.to_string(),
                raw_address,
                address,
            }),
            Err(e) => {
                tracing::debug!(
                    address = %raw_address,
                    error = %e,
                    "Skipping row with malformed address"
                );
            }
        }
    }

    let next_page = doc
        .find_by_text(Some("a"), TextMatch::Exact(NEXT_PAGE_TEXT))
        .and_then(|link| doc.attr(link, "href"))
        .and_then(|href| resolve_link(base, &href))
        .map(|url| url.to_string());

    Ok(ListingPage { rows, next_page })
}
