//! Field extractors for the Common Core of Data (public school) detail page.

use chrono::Utc;

use super::{
    GenderEnrollment, LunchEligibility, PhysicalAddress, RaceEnrollment, SchoolProfile,
    parse_grade_span, shaded_counts,
};
use crate::labels::{digits_to_int, float_after_label, int_after_label, text_after_label};
use crate::models::{NcesId, SourceType};
use crate::traits::{QueryableDocument, Sibling, TextMatch};

const RACE_CELL_COLOR: &str = "#B8EEA8";
const GENDER_CELL_COLOR: &str = "#F5F196";

pub(super) fn extract<D: QueryableDocument>(doc: &D, id: NcesId) -> SchoolProfile {
    SchoolProfile {
        id,
        source: SourceType::Public,
        school_type: school_type(doc),
        physical_address: physical_address(doc),
        county: text_after_label(doc, "County:"),
        locale: locale(doc),
        total_students: int_after_label(doc, "Total Students:"),
        classroom_teachers: float_after_label(doc, "Classroom Teachers (FTE):"),
        student_teacher_ratio: float_after_label(doc, "Student/Teacher Ratio:"),
        grade_span: grade_span(doc),
        enrollment_by_race: race(doc),
        enrollment_by_gender: gender(doc),
        lunch_eligibility: lunch(doc),
        fetched_at: Utc::now(),
    }
}

/// Values sit in the next `<font size="3">` after their label.
fn value_font_after<'a, D: QueryableDocument>(
    doc: &'a D,
    label: D::Node<'a>,
) -> Option<D::Node<'a>> {
    doc.find_next(label, "font", Some(("size", "3")))
}

fn school_type<D: QueryableDocument>(doc: &D) -> Option<String> {
    let label = doc.find_by_text(None, TextMatch::Contains("Type:"))?;
    let text = doc.text(value_font_after(doc, label)?);
    (!text.is_empty()).then_some(text)
}

/// The address is a map link whose direct text runs are the printed lines.
fn physical_address<D: QueryableDocument>(doc: &D) -> Option<PhysicalAddress> {
    let label = doc.find_by_text(Some("font"), TextMatch::Exact("Physical Address:"))?;
    let value = value_font_after(doc, label)?;
    let link = doc.select_in(value, "a").ok()?.into_iter().next()?;
    PhysicalAddress::from_lines(&doc.own_strings(link))
}

fn locale<D: QueryableDocument>(doc: &D) -> Option<String> {
    let strong = doc
        .select("strong")
        .ok()?
        .into_iter()
        .find(|&node| doc.text(node).contains("Locale:"))?;
    doc.next_siblings(strong)
        .into_iter()
        .find_map(|sibling| match sibling {
            Sibling::Text(text) => Some(text),
            Sibling::Element { .. } => None,
        })
}

fn grade_span<D: QueryableDocument>(doc: &D) -> Option<String> {
    let label = doc.find_by_text(None, TextMatch::Contains("Grade Span:"))?;
    let text = doc.find_next_text(label, TextMatch::Contains("(grades"))?;
    parse_grade_span(&text)
}

/// Cell order: American Indian/Alaska Native, Asian, Black, Hispanic,
/// Native Hawaiian/Pacific Islander, White, two or more races.
fn race<D: QueryableDocument>(doc: &D) -> RaceEnrollment {
    let v = shaded_counts(doc, "Enrollment by Race/Ethnicity:", RACE_CELL_COLOR, 7);
    RaceEnrollment {
        american_indian_alaska_native: v[0],
        asian: v[1],
        black: v[2],
        hispanic: v[3],
        native_hawaiian_pacific_islander: v[4],
        white: v[5],
        two_or_more_races: v[6],
    }
}

fn gender<D: QueryableDocument>(doc: &D) -> Option<GenderEnrollment> {
    doc.find_by_text(None, TextMatch::Exact("Enrollment by Gender:"))?;
    let v = shaded_counts(doc, "Enrollment by Gender:", GENDER_CELL_COLOR, 2);
    Some(GenderEnrollment {
        male: v[0],
        female: v[1],
    })
}

/// The row labelled "Free lunch eligible" carries free, reduced-price and
/// total counts, each as the last text run of the cell's first `<font>`.
fn lunch<D: QueryableDocument>(doc: &D) -> Option<LunchEligibility> {
    let label = doc.find_by_text(None, TextMatch::Exact("Free lunch eligible"))?;
    let row = doc.closest(label, &["tr"])?;
    let cells = doc.select_in(row, "td").ok()?;
    if cells.len() < 3 {
        return None;
    }

    let count = |cell| -> Option<u32> {
        let font = doc.select_in(cell, "font").ok()?.into_iter().next()?;
        digits_to_int(doc.own_strings(font).last()?)
    };
    Some(LunchEligibility {
        free: count(cells[0]),
        reduced_price: count(cells[1]),
        total: count(cells[2]),
    })
}
