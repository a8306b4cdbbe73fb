//! Request targets for the NCES listing and detail pages.
//!
//! Location fields are always sent blank: the directory's own location
//! filtering is not reliable enough to disambiguate, so rows are filtered
//! locally against the hints instead.

use url::Url;

use crate::config::Endpoints;
use crate::error::AppError;
use crate::models::{NcesId, SearchQuery, SourceType};

const LISTING_PAGE: &str = "school_list.asp";
const DETAIL_PAGE: &str = "school_detail.asp";

/// Width public identifiers are zero-padded to.
pub const PUBLIC_ID_WIDTH: usize = 12;

/// Blank location/contact fields shared by both search forms.
const BLANK_LOCATION_FIELDS: &[&str] = &[
    "SchoolID",
    "Address",
    "City",
    "State",
    "Zip",
    "Miles",
    "County",
    "PhoneAreaCode",
    "Phone",
];

/// Build the name search URL for the query's source.
pub fn listing_url(endpoints: &Endpoints, query: &SearchQuery) -> Result<Url, AppError> {
    let mut url = join(endpoints.base(query.source), LISTING_PAGE)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("Search", "1");
        match query.source {
            SourceType::Public => {
                pairs.append_pair("InstName", &query.name);
                for field in BLANK_LOCATION_FIELDS {
                    pairs.append_pair(field, "");
                }
                pairs
                    .append_pair("DistrictName", "")
                    .append_pair("DistrictID", "")
                    .append_pair("SpecificSchlTypes", "all")
                    .append_pair("IncGrade", "-1")
                    .append_pair("LoGrade", "-1")
                    .append_pair("HiGrade", "-1");
                // Request every school type so none is filtered out upstream.
                for school_type in ["1", "2", "3", "4"] {
                    pairs.append_pair("SchoolType", school_type);
                }
            }
            SourceType::Private => {
                pairs.append_pair("SchoolName", &query.name);
                for field in BLANK_LOCATION_FIELDS {
                    pairs.append_pair(field, "");
                }
                pairs
                    .append_pair("Religion", "")
                    .append_pair("Association", "")
                    .append_pair("SchoolType", "")
                    .append_pair("Coed", "")
                    .append_pair("NumOfStudents", "")
                    .append_pair("NumOfStudentsRange", "more")
                    .append_pair("IncGrade", "-1")
                    .append_pair("LoGrade", "-1")
                    .append_pair("HiGrade", "-1");
            }
        }
    }
    Ok(url)
}

/// Build the detail page URL for a known identifier.
pub fn detail_url(endpoints: &Endpoints, source: SourceType, id: &NcesId) -> Result<Url, AppError> {
    let mut url = join(endpoints.base(source), DETAIL_PAGE)?;
    match source {
        SourceType::Public => {
            let id = format!("{:0>width$}", id.as_str(), width = PUBLIC_ID_WIDTH);
            url.query_pairs_mut()
                .append_pair("Search", "1")
                .append_pair("SchoolID", &id)
                .append_pair("SchoolType", "1")
                .append_pair("SpecificSchlTypes", "all")
                .append_pair("IncGrade", "-1")
                .append_pair("LoGrade", "-1")
                .append_pair("HiGrade", "-1")
                .append_pair("ID", &id);
        }
        SourceType::Private => {
            url.query_pairs_mut()
                .append_pair("Search", "1")
                .append_pair("SchoolID", id.as_str())
                .append_pair("NumOfStudentsRange", "more")
                .append_pair("IncGrade", "-1")
                .append_pair("LoGrade", "-1")
                .append_pair("HiGrade", "-1")
                .append_pair("ID", id.as_str());
        }
    }
    Ok(url)
}

/// Resolve a link found on a listing page against the source's search root.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}

fn join(base: &Url, page: &str) -> Result<Url, AppError> {
    base.join(page)
        .map_err(|e| AppError::ConfigError(format!("Cannot join '{page}' onto {base}: {e}")))
}
