//! Field extractors for the Private School Survey detail page.

use chrono::Utc;

use super::{PhysicalAddress, RaceEnrollment, SchoolProfile, parse_grade_span, shaded_counts};
use crate::labels::{float_after_label, int_after_label, text_after_label};
use crate::models::{NcesId, SourceType};
use crate::traits::{QueryableDocument, Sibling, TextMatch};

const RACE_CELL_COLOR: &str = "#B8EEA8";

pub(super) fn extract<D: QueryableDocument>(doc: &D, id: NcesId) -> SchoolProfile {
    SchoolProfile {
        id,
        source: SourceType::Private,
        school_type: school_type(doc),
        physical_address: physical_address(doc),
        county: text_after_label(doc, "County:"),
        locale: locale(doc),
        total_students: int_after_label(doc, "Total Students:"),
        classroom_teachers: float_after_label(doc, "Classroom Teachers (FTE):"),
        student_teacher_ratio: float_after_label(doc, "Student/Teacher Ratio:"),
        grade_span: grade_span(doc),
        enrollment_by_race: race(doc),
        enrollment_by_gender: None,
        lunch_eligibility: None,
        fetched_at: Utc::now(),
    }
}

fn school_type<D: QueryableDocument>(doc: &D) -> Option<String> {
    let label = doc.find_by_text(Some("th"), TextMatch::Exact("Type:"))?;
    let text = doc.text(doc.find_next(label, "td", None)?);
    (!text.is_empty()).then_some(text)
}

/// Lines follow the bold label as loose text and `<font>` runs separated by
/// `<br>`; any other element ends the address.
fn physical_address<D: QueryableDocument>(doc: &D) -> Option<PhysicalAddress> {
    let label = doc.find_by_text(Some("strong"), TextMatch::Exact("Physical Address:"))?;
    let mut lines = Vec::new();
    for sibling in doc.next_siblings(label) {
        match sibling {
            Sibling::Text(text) => lines.push(text),
            Sibling::Element { tag, .. } if tag == "br" => {}
            Sibling::Element { tag, node } if tag == "font" => lines.push(doc.text(node)),
            Sibling::Element { .. } => break,
        }
    }
    PhysicalAddress::from_lines(&lines)
}

fn locale<D: QueryableDocument>(doc: &D) -> Option<String> {
    let label = doc.find_by_text(None, TextMatch::Exact("Locale/Code:"))?;
    let text = doc.text(doc.find_next(label, "td", None)?);
    (!text.is_empty()).then_some(text)
}

fn grade_span<D: QueryableDocument>(doc: &D) -> Option<String> {
    let label = doc.find_by_text(Some("strong"), TextMatch::Exact("Grade Span:"))?;
    doc.next_siblings(label)
        .into_iter()
        .find_map(|sibling| match sibling {
            Sibling::Element { tag, node } if tag == "font" => Some(doc.text(node)),
            _ => None,
        })
        .and_then(|text| parse_grade_span(&text))
}

/// Cell order: American Indian/Alaska Native, Asian, Black, Hispanic,
/// White, Native Hawaiian/Pacific Islander, two or more races.
fn race<D: QueryableDocument>(doc: &D) -> RaceEnrollment {
    let v = shaded_counts(doc, "Enrollment by Race/Ethnicity:", RACE_CELL_COLOR, 7);
    RaceEnrollment {
        american_indian_alaska_native: v[0],
        asian: v[1],
        black: v[2],
        hispanic: v[3],
        white: v[4],
        native_hawaiian_pacific_islander: v[5],
        two_or_more_races: v[6],
    }
}
