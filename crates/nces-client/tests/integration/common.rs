use nces_client::HtmlParser;
use nces_core::testutil::MockFetcher;
use nces_core::{LocationHints, ResolverConfig, SchoolResolver, SearchQuery, SourceType};

pub const PUBLIC_LISTING_SHILOH: &str = include_str!("../fixtures/public_listing_shiloh.html");
pub const PUBLIC_LISTING_PAGE1: &str = include_str!("../fixtures/public_listing_page1.html");
pub const PUBLIC_LISTING_EMPTY: &str = include_str!("../fixtures/public_listing_empty.html");
pub const PUBLIC_DETAIL_SHILOH: &str = include_str!("../fixtures/public_detail_shiloh.html");
pub const PRIVATE_LISTING_FUQUA: &str = include_str!("../fixtures/private_listing_fuqua.html");
pub const PRIVATE_LISTING_EMPTY: &str = include_str!("../fixtures/private_listing_empty.html");
pub const PRIVATE_DETAIL_FUQUA: &str = include_str!("../fixtures/private_detail_fuqua.html");
pub const DETAIL_WITHOUT_ID: &str = include_str!("../fixtures/detail_without_id.html");

pub const PUBLIC_ROOT: &str = "https://nces.ed.gov/ccd/schoolsearch/";
pub const PRIVATE_ROOT: &str = "https://nces.ed.gov/surveys/pss/privateschoolsearch/";

pub fn query(
    name: &str,
    city: Option<&str>,
    state: Option<&str>,
    zip: Option<&str>,
    source: SourceType,
) -> SearchQuery {
    SearchQuery::new(name, LocationHints::new(city, state, zip), source).unwrap()
}

pub fn resolver(fetcher: &MockFetcher) -> SchoolResolver<MockFetcher, HtmlParser> {
    SchoolResolver::new(fetcher.clone(), HtmlParser)
}

pub fn resolver_with(
    fetcher: &MockFetcher,
    config: ResolverConfig,
) -> SchoolResolver<MockFetcher, HtmlParser> {
    SchoolResolver::with_config(fetcher.clone(), HtmlParser, config)
}
