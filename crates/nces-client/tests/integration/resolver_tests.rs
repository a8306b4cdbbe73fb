use nces_core::testutil::MockFetcher;
use nces_core::{AppError, Endpoints, NcesId, Resolution, ResolverConfig, SourceType};

use crate::integration::common::*;

#[tokio::test]
async fn resolves_public_school_on_exact_hints() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_SHILOH, PUBLIC_DETAIL_SHILOH]);
    let q = query(
        "Shiloh High School",
        Some("Snellville"),
        Some("GA"),
        Some("30039"),
        SourceType::Public,
    );

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(
        resolution,
        Resolution::Found {
            id: NcesId::parse("130255001937").unwrap(),
            source: SourceType::Public,
        }
    );
    assert_eq!(fetcher.count_matching("school_list.asp"), 1);
    let requests = fetcher.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with(&format!(
        "{PUBLIC_ROOT}school_list.asp?Search=1&InstName=Shiloh+High+School&"
    )));
    assert_eq!(
        requests[1],
        format!("{PUBLIC_ROOT}school_detail.asp?Search=1&ID=130255001937")
    );
}

#[tokio::test]
async fn hint_matching_ignores_case() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_SHILOH, PUBLIC_DETAIL_SHILOH]);
    let q = query(
        "Shiloh High School",
        Some("SNELLVILLE"),
        Some("ga"),
        None,
        SourceType::Public,
    );

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(resolution.id().map(NcesId::as_str), Some("130255001937"));
}

#[tokio::test]
async fn zip_only_hint_selects_the_matching_row() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_SHILOH, PUBLIC_DETAIL_SHILOH]);
    let q = query("Shiloh High School", None, None, Some("95326"), SourceType::Public);

    resolver(&fetcher).resolve(&q).await.unwrap();

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].ends_with("ID=063201004958"));
}

#[tokio::test]
async fn city_and_zip_without_state_resolves_on_zip() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_SHILOH, PUBLIC_DETAIL_SHILOH]);
    let q = query("Shiloh High School", Some("Hughson"), None, Some("95326"), SourceType::Public);

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert!(matches!(resolution, Resolution::Found { source: SourceType::Public, .. }));
    let requests = fetcher.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].ends_with("ID=063201004958"));
    assert_eq!(fetcher.count_matching(PRIVATE_ROOT), 0);
}

#[tokio::test]
async fn follows_next_page_link_until_a_candidate_matches() {
    let fetcher = MockFetcher::with_pages(&[
        PUBLIC_LISTING_PAGE1,
        PUBLIC_LISTING_SHILOH,
        PUBLIC_DETAIL_SHILOH,
    ]);
    let q = query(
        "Shiloh High School",
        Some("Snellville"),
        Some("GA"),
        Some("30039"),
        SourceType::Public,
    );

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(resolution.id().map(NcesId::as_str), Some("130255001937"));
    assert_eq!(fetcher.count_matching("school_list.asp"), 2);
    let requests = fetcher.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[1],
        format!("{PUBLIC_ROOT}school_list.asp?Search=1&InstName=Shiloh+High+School&Page=2")
    );
}

#[tokio::test]
async fn partial_match_on_first_page_stops_pagination() {
    // Page 1 has an Illinois row and a next link; a state-only hint must
    // settle on that row without requesting page 2.
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_PAGE1, PUBLIC_DETAIL_SHILOH]);
    let q = query("Shiloh High School", None, Some("IL"), None, SourceType::Public);

    resolver(&fetcher).resolve(&q).await.unwrap();

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].ends_with("ID=171710001234"));
    assert_eq!(fetcher.count_matching("Page=2"), 0);
}

#[tokio::test]
async fn falls_back_to_private_directory() {
    let fetcher = MockFetcher::with_pages(&[
        PUBLIC_LISTING_EMPTY,
        PRIVATE_LISTING_FUQUA,
        PRIVATE_DETAIL_FUQUA,
    ]);
    let q = query(
        "Fuqua School",
        Some("Farmville"),
        Some("VA"),
        Some("23901"),
        SourceType::Public,
    );

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(
        resolution,
        Resolution::Found {
            id: NcesId::parse("01434161").unwrap(),
            source: SourceType::Private,
        }
    );
    let requests = fetcher.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].starts_with(PUBLIC_ROOT));
    assert!(requests[1].starts_with(&format!(
        "{PRIVATE_ROOT}school_list.asp?Search=1&SchoolName=Fuqua+School&"
    )));
    assert_eq!(
        requests[2],
        format!("{PRIVATE_ROOT}school_detail.asp?Search=1&ID=01434161")
    );
}

#[tokio::test]
async fn not_found_after_both_directories() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_EMPTY, PRIVATE_LISTING_EMPTY]);
    let q = query(
        "Nonexistent School",
        Some("Nowhere"),
        Some("NA"),
        Some("00000"),
        SourceType::Public,
    );

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.requests().len(), 2);
    assert_eq!(fetcher.count_matching("school_list.asp"), 2);
    assert_eq!(fetcher.remaining(), 0);
}

#[tokio::test]
async fn detail_page_without_identifier_falls_back() {
    let fetcher = MockFetcher::with_pages(&[
        PUBLIC_LISTING_SHILOH,
        DETAIL_WITHOUT_ID,
        PRIVATE_LISTING_EMPTY,
    ]);
    let q = query(
        "Shiloh High School",
        Some("Snellville"),
        Some("GA"),
        Some("30039"),
        SourceType::Public,
    );

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.requests().len(), 3);
    assert_eq!(fetcher.count_matching(PRIVATE_ROOT), 1);
}

#[tokio::test]
async fn private_query_never_searches_public() {
    let fetcher = MockFetcher::with_pages(&[PRIVATE_LISTING_EMPTY]);
    let q = query("Fuqua School", Some("Farmville"), None, None, SourceType::Private);

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.requests().len(), 1);
    assert_eq!(fetcher.count_matching(PUBLIC_ROOT), 0);
}

#[tokio::test]
async fn unsupported_hint_combination_matches_nothing() {
    // State plus zip without a city is not one of the accepted combinations.
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_SHILOH, PRIVATE_LISTING_EMPTY]);
    let q = query("Shiloh High School", None, Some("GA"), Some("30039"), SourceType::Public);

    let resolution = resolver(&fetcher).resolve(&q).await.unwrap();

    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.count_matching("school_detail.asp"), 0);
}

#[tokio::test]
async fn listing_transport_error_aborts_without_fallback() {
    let fetcher = MockFetcher::with_error(AppError::Timeout(30));
    let q = query(
        "Fuqua School",
        Some("Farmville"),
        Some("VA"),
        Some("23901"),
        SourceType::Public,
    );

    let err = resolver(&fetcher).resolve(&q).await.unwrap_err();

    assert!(matches!(err, AppError::Timeout(30)));
    assert_eq!(fetcher.requests().len(), 1);
    assert_eq!(fetcher.count_matching(PRIVATE_ROOT), 0);
}

#[tokio::test]
async fn detail_http_error_propagates() {
    let fetcher = MockFetcher::with_responses(vec![
        Ok(PUBLIC_LISTING_SHILOH.to_string()),
        Err(AppError::HttpError("HTTP 503 for detail".into())),
    ]);
    let q = query(
        "Shiloh High School",
        Some("Snellville"),
        Some("GA"),
        Some("30039"),
        SourceType::Public,
    );

    let err = resolver(&fetcher).resolve(&q).await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn pagination_stops_at_configured_limit() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_PAGE1; 5]);
    let config = ResolverConfig::default().with_max_pages(3).unwrap();
    let q = query(
        "Shiloh High School",
        Some("Snellville"),
        Some("GA"),
        Some("30039"),
        SourceType::Public,
    );

    let err = resolver_with(&fetcher, config).resolve(&q).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::PaginationLimitExceeded {
            source_type: SourceType::Public,
            max_pages: 3,
        }
    ));
    assert_eq!(fetcher.requests().len(), 3);
}

#[tokio::test]
async fn custom_endpoints_are_used_for_every_request() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_SHILOH, PUBLIC_DETAIL_SHILOH]);
    let config = ResolverConfig {
        endpoints: Endpoints::new("http://mirror.test/ccd", "http://mirror.test/pss").unwrap(),
        ..ResolverConfig::default()
    };
    let q = query("Shiloh High School", Some("Snellville"), Some("GA"), None, SourceType::Public);

    resolver_with(&fetcher, config).resolve(&q).await.unwrap();

    let requests = fetcher.requests();
    assert!(requests[0].starts_with("http://mirror.test/ccd/school_list.asp?"));
    assert_eq!(
        requests[1],
        "http://mirror.test/ccd/school_detail.asp?Search=1&ID=130255001937"
    );
}

#[tokio::test]
async fn resolver_is_reusable_across_queries() {
    let fetcher = MockFetcher::with_pages(&[
        PUBLIC_LISTING_SHILOH,
        PUBLIC_DETAIL_SHILOH,
        PUBLIC_LISTING_SHILOH,
        PUBLIC_DETAIL_SHILOH,
    ]);
    let resolver = resolver(&fetcher);
    let q = query("Shiloh High School", Some("Snellville"), Some("GA"), None, SourceType::Public);

    let first = resolver.resolve(&q).await.unwrap();
    let second = resolver.resolve(&q).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.requests().len(), 4);
}
