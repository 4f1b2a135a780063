use crate::data::cell_value::CellValue;
use std::cmp::Ordering;

/// Compare two cell values the way a grid column sorts them.
///
/// Numbers compare numerically (integers and floats mix freely), dates
/// compare chronologically against dates of the same kind, and every other
/// pairing falls back to a lexical comparison of the string forms.
pub fn compare_cell_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
        (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
        (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            let (fa, fb) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
        (a, b) => a.string_form().cmp(&b.string_form()),
    }
}

/// Compare optional values; a missing value compares like an empty string
pub fn compare_optional_cell_values(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_cell_values(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(b)) => compare_cell_values(&CellValue::Null, b),
        (Some(a), None) => compare_cell_values(a, &CellValue::Null),
    }
}
