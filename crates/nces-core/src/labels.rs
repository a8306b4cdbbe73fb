//! Lookups for values printed in the table cell after a text label.

use crate::traits::{QueryableDocument, Sibling, TextMatch};

/// Keep only the digits of `text` and parse them.
///
/// `"2,203"` gives 2203, `"-789"` gives 789, text without digits gives `None`.
pub fn digits_to_int(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// `<td>` cells following the cell that holds `label`.
fn cells_after_label<'a, D: QueryableDocument>(
    doc: &'a D,
    label: TextMatch<'_>,
) -> Vec<D::Node<'a>> {
    let Some(cell) = doc
        .find_by_text(None, label)
        .and_then(|holder| doc.closest(holder, &["td"]))
    else {
        return Vec::new();
    };
    doc.next_siblings(cell)
        .into_iter()
        .filter_map(|sibling| match sibling {
            Sibling::Element { tag, node } if tag == "td" => Some(node),
            _ => None,
        })
        .collect()
}

/// First integer in a cell after the one holding exactly `label`.
pub fn int_after_label<D: QueryableDocument>(doc: &D, label: &str) -> Option<u32> {
    cells_after_label(doc, TextMatch::Exact(label))
        .into_iter()
        .find_map(|cell| digits_to_int(&doc.text(cell)))
}

/// First cell after the one containing `label` that parses as a float.
pub fn float_after_label<D: QueryableDocument>(doc: &D, label: &str) -> Option<f64> {
    cells_after_label(doc, TextMatch::Contains(label))
        .into_iter()
        .find_map(|cell| doc.text(cell).parse::<f64>().ok())
}

/// The text run right after `label` inside its enclosing cell or row.
pub fn text_after_label<D: QueryableDocument>(doc: &D, label: &str) -> Option<String> {
    let holder = doc.find_by_text(None, TextMatch::Exact(label))?;
    let container = doc.closest(holder, &["td", "tr"])?;
    let strings = doc.strings(container);
    let position = strings.iter().position(|s| s.contains(label))?;
    strings.get(position + 1).cloned()
}
