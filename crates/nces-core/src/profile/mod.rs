//! School profiles read from NCES detail pages.
//!
//! Every field is optional: a label missing from the page yields `None`
//! rather than an error, since the two directories and their vintages do
//! not print the same set of fields.

mod private;
mod public;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::address::PostalAddress;
use crate::config::ResolverConfig;
use crate::error::AppError;
use crate::labels::digits_to_int;
use crate::models::{NcesId, Resolution, SearchQuery, SourceType};
use crate::query::detail_url;
use crate::resolver::SchoolResolver;
use crate::traits::{DocumentParser, Fetcher, QueryableDocument, TextMatch};

/// Structured attributes of one school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolProfile {
    pub id: NcesId,
    pub source: SourceType,
    pub school_type: Option<String>,
    pub physical_address: Option<PhysicalAddress>,
    pub county: Option<String>,
    pub locale: Option<String>,
    pub total_students: Option<u32>,
    /// Full-time equivalent.
    pub classroom_teachers: Option<f64>,
    pub student_teacher_ratio: Option<f64>,
    pub grade_span: Option<String>,
    pub enrollment_by_race: RaceEnrollment,
    /// Public schools only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_by_gender: Option<GenderEnrollment>,
    /// Public schools only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunch_eligibility: Option<LunchEligibility>,
    pub fetched_at: DateTime<Utc>,
}

/// Physical address as printed, plus its parsed parts when the last line
/// follows the `city, ST zip` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalAddress {
    pub full: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub zip_suffix: Option<String>,
}

impl PhysicalAddress {
    /// Build from the address lines in printed order.
    fn from_lines(lines: &[String]) -> Option<Self> {
        let lines: Vec<String> = lines
            .iter()
            .map(|l| l.replace('\u{a0}', " ").trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let last = lines.last()?;

        let parsed = PostalAddress::parse(last).ok();
        let street = match (&parsed, lines.len()) {
            (_, n) if n > 1 => Some(lines[0].clone()),
            (Some(p), _) if !p.street.is_empty() => Some(p.street.clone()),
            _ => None,
        };

        Some(Self {
            full: lines.join(" "),
            street,
            city: parsed.as_ref().map(|p| p.city.clone()),
            state: parsed.as_ref().map(|p| p.state.clone()),
            zip: parsed.as_ref().map(|p| p.zip.clone()),
            zip_suffix: parsed.and_then(|p| p.zip_suffix),
        })
    }
}

/// Enrollment counts by race/ethnicity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RaceEnrollment {
    pub american_indian_alaska_native: Option<u32>,
    pub asian: Option<u32>,
    pub black: Option<u32>,
    pub hispanic: Option<u32>,
    pub white: Option<u32>,
    pub native_hawaiian_pacific_islander: Option<u32>,
    pub two_or_more_races: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenderEnrollment {
    pub male: Option<u32>,
    pub female: Option<u32>,
}

/// Free and reduced-price lunch eligibility counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LunchEligibility {
    pub free: Option<u32>,
    pub reduced_price: Option<u32>,
    pub total: Option<u32>,
}

/// Read every profile field from a parsed detail page.
pub fn extract_profile<D: QueryableDocument>(
    doc: &D,
    source: SourceType,
    id: NcesId,
) -> SchoolProfile {
    match source {
        SourceType::Public => public::extract(doc, id),
        SourceType::Private => private::extract(doc, id),
    }
}

/// Numbers in the shaded cells of the table following `label`.
///
/// Always returns `count` entries; missing cells are `None`.
fn shaded_counts<D: QueryableDocument>(
    doc: &D,
    label: &str,
    bgcolor: &str,
    count: usize,
) -> Vec<Option<u32>> {
    let mut values: Vec<Option<u32>> = doc
        .find_by_text(None, TextMatch::Exact(label))
        .and_then(|holder| doc.find_next(holder, "table", None))
        .and_then(|table| {
            doc.select_in(table, &format!(r#"td[bgcolor="{bgcolor}"]"#))
                .ok()
        })
        .map(|cells| {
            cells
                .into_iter()
                .take(count)
                .map(|cell| digits_to_int(&doc.text(cell)))
                .collect()
        })
        .unwrap_or_default();
    values.resize(count, None);
    values
}

/// `"(grades 9 - 12)"` becomes `"9-12"`.
fn parse_grade_span(text: &str) -> Option<String> {
    let start = text.find("(grades ")? + "(grades ".len();
    let rest = &text[start..];
    let end = rest.find(')')?;
    let span: String = rest[..end].chars().filter(|c| !c.is_whitespace()).collect();
    if span.is_empty() { None } else { Some(span) }
}

/// Fetches detail pages and turns them into [`SchoolProfile`]s.
pub struct ProfileService<F, P>
where
    F: Fetcher,
    P: DocumentParser,
{
    fetcher: F,
    parser: P,
    resolver: SchoolResolver<F, P>,
}

impl<F, P> ProfileService<F, P>
where
    F: Fetcher,
    P: DocumentParser,
{
    pub fn new(fetcher: F, parser: P, config: ResolverConfig) -> Self {
        let resolver = SchoolResolver::with_config(fetcher.clone(), parser.clone(), config);
        Self {
            fetcher,
            parser,
            resolver,
        }
    }

    pub fn resolver(&self) -> &SchoolResolver<F, P> {
        &self.resolver
    }

    /// Fetch and extract the profile of a school whose identifier is known.
    pub async fn fetch_profile(
        &self,
        source: SourceType,
        id: &NcesId,
    ) -> Result<SchoolProfile, AppError> {
        let url = detail_url(&self.resolver.config().endpoints, source, id)?;
        tracing::info!(%id, %source, "Fetching school profile");
        let html = self.fetcher.fetch(url.as_str()).await?;
        let doc = self.parser.parse(&html)?;
        Ok(extract_profile(&doc, source, id.clone()))
    }

    /// Resolve `query` and fetch the profile from the source that matched.
    ///
    /// Returns `Ok(None)` when the school was not found on any source.
    pub async fn resolve_profile(
        &self,
        query: &SearchQuery,
    ) -> Result<Option<SchoolProfile>, AppError> {
        match self.resolver.resolve(query).await? {
            Resolution::Found { id, source } => self.fetch_profile(source, &id).await.map(Some),
            Resolution::NotFound => Ok(None),
        }
    }
}
