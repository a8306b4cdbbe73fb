use crate::config::ResolverConfig;
use crate::error::AppError;
use crate::listing::{ListingPage, parse_listing};
use crate::models::{NcesId, Resolution, SearchQuery, SourceType};
use crate::query::listing_url;
use crate::scoring::select_candidate;
use crate::traits::{DocumentParser, Fetcher, QueryableDocument, Sibling, TextMatch};

/// Resolves a school name plus location hints to its NCES identifier.
///
/// Runs the name search on the query's source, walks the listing pages
/// until a candidate matches the hints, then reads the identifier from that
/// school's detail page. A public search that ends without an identifier is
/// retried once on the private directory.
///
/// Holds no per-call state, so one resolver can serve many calls.
pub struct SchoolResolver<F, P>
where
    F: Fetcher,
    P: DocumentParser,
{
    fetcher: F,
    parser: P,
    config: ResolverConfig,
}

impl<F, P> SchoolResolver<F, P>
where
    F: Fetcher,
    P: DocumentParser,
{
    pub fn new(fetcher: F, parser: P) -> Self {
        Self::with_config(fetcher, parser, ResolverConfig::default())
    }

    pub fn with_config(fetcher: F, parser: P, config: ResolverConfig) -> Self {
        Self {
            fetcher,
            parser,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `query`, falling back from public to private when needed.
    ///
    /// Returns `Resolution::NotFound` when every source was searched without
    /// producing an identifier. Transport failures abort immediately.
    pub async fn resolve(&self, query: &SearchQuery) -> Result<Resolution, AppError> {
        for &source in query.source.attempt_order() {
            let attempt = query.for_source(source);
            if let Some(id) = self.resolve_on_source(&attempt).await? {
                tracing::info!(name = %query.name, %source, %id, "Resolved NCES identifier");
                return Ok(Resolution::Found { id, source });
            }
            tracing::info!(name = %query.name, %source, "No identifier on this source");
        }
        Ok(Resolution::NotFound)
    }

    /// One full attempt on the query's source: listing traversal, then the
    /// winner's detail page.
    async fn resolve_on_source(&self, query: &SearchQuery) -> Result<Option<NcesId>, AppError> {
        let Some(detail_url) = self.find_detail_url(query).await? else {
            return Ok(None);
        };

        tracing::debug!(url = %detail_url, "Fetching detail page");
        let html = self.fetcher.fetch(&detail_url).await?;
        let id = self.read_identifier(&html, query.source)?;
        if id.is_none() {
            tracing::warn!(url = %detail_url, "Detail page has no NCES School ID");
        }
        Ok(id)
    }

    /// Walk listing pages until one yields a candidate, up to `max_pages`.
    async fn find_detail_url(&self, query: &SearchQuery) -> Result<Option<String>, AppError> {
        let base = self.config.endpoints.base(query.source);
        let mut url = listing_url(&self.config.endpoints, query)?.to_string();

        for page_number in 1..=self.config.max_pages {
            tracing::debug!(
                %url,
                page = page_number,
                source = %query.source,
                "Fetching listing page"
            );
            let html = self.fetcher.fetch(&url).await?;
            let page = self.parse_listing_page(&html, query.source, base)?;

            if let Some(row) = select_candidate(&page.rows, &query.hints).winner() {
                tracing::debug!(
                    address = %row.raw_address,
                    page = page_number,
                    "Selected candidate"
                );
                return Ok(Some(row.detail_url.clone()));
            }

            tracing::debug!(
                rows = page.rows.len(),
                page = page_number,
                "No candidate on listing page"
            );
            match page.next_page {
                Some(next) => url = next,
                None => return Ok(None),
            }
        }

        Err(AppError::PaginationLimitExceeded {
            source_type: query.source,
            max_pages: self.config.max_pages,
        })
    }

    fn parse_listing_page(
        &self,
        html: &str,
        source: SourceType,
        base: &url::Url,
    ) -> Result<ListingPage, AppError> {
        let doc = self.parser.parse(html)?;
        parse_listing(&doc, source, base)
    }

    /// Read the identifier printed on a detail page.
    pub fn read_identifier(
        &self,
        html: &str,
        source: SourceType,
    ) -> Result<Option<NcesId>, AppError> {
        let doc = self.parser.parse(html)?;
        Ok(identifier_from_detail(&doc, source))
    }
}

/// Locate the "NCES School ID:" label and read the value that follows it.
pub fn identifier_from_detail<D: QueryableDocument>(
    doc: &D,
    source: SourceType,
) -> Option<NcesId> {
    const LABEL: &str = "NCES School ID:";

    match source {
        SourceType::Public => {
            let label = doc.find_by_text(Some("font"), TextMatch::Exact(LABEL))?;
            let value = doc.find_next(label, "font", Some(("size", "3")))?;
            NcesId::parse(&doc.text(value))
        }
        SourceType::Private => {
            let label = doc.find_by_text(Some("strong"), TextMatch::Contains(LABEL))?;
            let br = doc.find_next(label, "br", None)?;
            match doc.next_siblings(br).into_iter().next()? {
                Sibling::Text(text) => NcesId::parse(&text),
                Sibling::Element { node, .. } => NcesId::parse(&doc.text(node)),
            }
        }
    }
}
