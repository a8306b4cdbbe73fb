use nces_client::HtmlParser;
use nces_core::profile::{GenderEnrollment, LunchEligibility, RaceEnrollment};
use nces_core::testutil::MockFetcher;
use nces_core::traits::DocumentParser;
use nces_core::{NcesId, ProfileService, ResolverConfig, SourceType, extract_profile};

use crate::integration::common::*;

fn service(fetcher: &MockFetcher) -> ProfileService<MockFetcher, HtmlParser> {
    ProfileService::new(fetcher.clone(), HtmlParser, ResolverConfig::default())
}

#[test]
fn public_profile_fields() {
    let doc = HtmlParser.parse(PUBLIC_DETAIL_SHILOH).unwrap();
    let id = NcesId::parse("130255001937").unwrap();

    let profile = extract_profile(&doc, SourceType::Public, id.clone());

    assert_eq!(profile.id, id);
    assert_eq!(profile.source, SourceType::Public);
    assert_eq!(profile.school_type.as_deref(), Some("Regular school"));
    let address = profile.physical_address.unwrap();
    assert_eq!(address.full, "4210 Shiloh Rd Snellville, GA 30039");
    assert_eq!(address.street.as_deref(), Some("4210 Shiloh Rd"));
    assert_eq!(address.city.as_deref(), Some("Snellville"));
    assert_eq!(profile.county.as_deref(), Some("Gwinnett County"));
    assert_eq!(profile.locale.as_deref(), Some("Suburb: Large (21)"));
    assert_eq!(profile.total_students, Some(2203));
    assert_eq!(profile.classroom_teachers, Some(134.2));
    assert_eq!(profile.student_teacher_ratio, Some(16.42));
    assert_eq!(profile.grade_span.as_deref(), Some("9-12"));
    assert_eq!(
        profile.enrollment_by_race,
        RaceEnrollment {
            american_indian_alaska_native: Some(2),
            asian: Some(78),
            black: Some(1476),
            hispanic: Some(512),
            white: Some(73),
            native_hawaiian_pacific_islander: Some(1),
            two_or_more_races: Some(61),
        }
    );
    assert_eq!(
        profile.enrollment_by_gender,
        Some(GenderEnrollment {
            male: Some(1200),
            female: Some(1003),
        })
    );
    assert_eq!(
        profile.lunch_eligibility,
        Some(LunchEligibility {
            free: Some(1156),
            reduced_price: Some(270),
            total: Some(1426),
        })
    );
}

#[test]
fn private_profile_fields() {
    let doc = HtmlParser.parse(PRIVATE_DETAIL_FUQUA).unwrap();
    let id = NcesId::parse("01434161").unwrap();

    let profile = extract_profile(&doc, SourceType::Private, id);

    assert_eq!(
        profile.school_type.as_deref(),
        Some("Regular elementary or secondary")
    );
    let address = profile.physical_address.unwrap();
    assert_eq!(address.full, "Po Box 328 Farmville, VA 23901-0328");
    assert_eq!(address.street.as_deref(), Some("Po Box 328"));
    assert_eq!(address.city.as_deref(), Some("Farmville"));
    assert_eq!(address.state.as_deref(), Some("VA"));
    assert_eq!(address.zip.as_deref(), Some("23901"));
    assert_eq!(address.zip_suffix.as_deref(), Some("0328"));
    assert_eq!(profile.county.as_deref(), Some("Prince Edward"));
    assert_eq!(profile.locale.as_deref(), Some("Remote town / 33"));
    assert_eq!(profile.total_students, Some(298));
    assert_eq!(profile.classroom_teachers, Some(28.1));
    assert_eq!(profile.student_teacher_ratio, Some(9.3));
    assert_eq!(profile.grade_span.as_deref(), Some("PK-12"));
    assert_eq!(profile.enrollment_by_race.white, Some(221));
    assert_eq!(profile.enrollment_by_race.native_hawaiian_pacific_islander, Some(1));
    assert_eq!(profile.enrollment_by_race.two_or_more_races, Some(4));
    assert_eq!(profile.enrollment_by_gender, None);
    assert_eq!(profile.lunch_eligibility, None);
}

#[test]
fn missing_fields_are_none() {
    let doc = HtmlParser.parse(DETAIL_WITHOUT_ID).unwrap();
    let id = NcesId::parse("130255001937").unwrap();

    let profile = extract_profile(&doc, SourceType::Public, id);

    assert_eq!(profile.school_type, None);
    assert_eq!(profile.physical_address, None);
    assert_eq!(profile.total_students, None);
    assert_eq!(profile.enrollment_by_race, RaceEnrollment::default());
    assert_eq!(profile.enrollment_by_gender, None);
    assert_eq!(profile.lunch_eligibility, None);
}

#[test]
fn profile_serializes_without_absent_public_only_sections() {
    let doc = HtmlParser.parse(PRIVATE_DETAIL_FUQUA).unwrap();
    let profile = extract_profile(&doc, SourceType::Private, NcesId::parse("01434161").unwrap());

    let json = serde_json::to_value(&profile).unwrap();

    assert_eq!(json["id"], "01434161");
    assert_eq!(json["source"], "private");
    assert_eq!(json["total_students"], 298);
    assert!(json.get("enrollment_by_gender").is_none());
    assert!(json.get("lunch_eligibility").is_none());
}

#[tokio::test]
async fn fetch_profile_requests_padded_public_detail_url() {
    let fetcher = MockFetcher::new(PUBLIC_DETAIL_SHILOH);
    let id = NcesId::parse("10009000011").unwrap();

    let profile = service(&fetcher)
        .fetch_profile(SourceType::Public, &id)
        .await
        .unwrap();

    assert_eq!(profile.id, id);
    assert_eq!(
        fetcher.requests(),
        vec![format!(
            "{PUBLIC_ROOT}school_detail.asp?Search=1&SchoolID=010009000011&SchoolType=1&SpecificSchlTypes=all&IncGrade=-1&LoGrade=-1&HiGrade=-1&ID=010009000011"
        )]
    );
}

#[tokio::test]
async fn resolve_profile_fetches_the_winning_school() {
    let fetcher = MockFetcher::with_pages(&[
        PRIVATE_LISTING_FUQUA,
        PRIVATE_DETAIL_FUQUA,
        PRIVATE_DETAIL_FUQUA,
    ]);
    let q = query("Fuqua School", Some("Farmville"), Some("VA"), None, SourceType::Private);

    let profile = service(&fetcher).resolve_profile(&q).await.unwrap().unwrap();

    assert_eq!(profile.id.as_str(), "01434161");
    assert_eq!(profile.source, SourceType::Private);
    let requests = fetcher.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2].starts_with(&format!(
        "{PRIVATE_ROOT}school_detail.asp?Search=1&SchoolID=01434161"
    )));
}

#[tokio::test]
async fn resolve_profile_returns_none_when_not_found() {
    let fetcher = MockFetcher::with_pages(&[PUBLIC_LISTING_EMPTY, PRIVATE_LISTING_EMPTY]);
    let q = query("Nonexistent School", Some("Nowhere"), None, None, SourceType::Public);

    let profile = service(&fetcher).resolve_profile(&q).await.unwrap();

    assert!(profile.is_none());
    assert_eq!(fetcher.requests().len(), 2);
}
