//! Value formatting for grid cells
//!
//! Maps a raw [`CellValue`] plus the column's declared [`SemanticType`] to the
//! text shown in the cell. Formatting never fails: missing values and nulls
//! render as the configured "not available" marker, and values that do not
//! fit the declared type fall back to their plain string form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::data::cell_value::CellValue;

/// Marker shown for null or missing values
pub const NOT_AVAILABLE: &str = "N/A";

/// Upper bound on currency decimals
pub const MAX_CURRENCY_DECIMALS: usize = 6;

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";
const PHONE_DIGITS: usize = 10;

static PHONE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s.()\-]").unwrap());

/// Declared interpretation of a column's raw values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    #[default]
    Text,
    Number,
    Date,
    DateTime,
    Currency,
    Percentage,
    Status,
    Uppercase,
    Lowercase,
    Phone,
}

impl From<&str> for SemanticType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text" | "" => SemanticType::Text,
            "number" => SemanticType::Number,
            "date" => SemanticType::Date,
            "datetime" | "date_time" => SemanticType::DateTime,
            "currency" | "money" => SemanticType::Currency,
            "percentage" | "percent" => SemanticType::Percentage,
            "status" | "boolean" | "bool" => SemanticType::Status,
            "uppercase" => SemanticType::Uppercase,
            "lowercase" => SemanticType::Lowercase,
            "phone" => SemanticType::Phone,
            other => {
                warn!(target: "config", "Unknown semantic type '{}', using text", other);
                SemanticType::Text
            }
        }
    }
}

/// Severity hint attached to status cells for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTag {
    Success,
    Danger,
    Warning,
    Info,
}

/// The closed set of status labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Active,
    Inactive,
    Pending,
    Completed,
}

impl StatusLabel {
    pub fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Boolean(true) => Some(StatusLabel::Active),
            CellValue::Boolean(false) => Some(StatusLabel::Inactive),
            CellValue::String(s) => match s.trim().to_lowercase().as_str() {
                "active" | "true" => Some(StatusLabel::Active),
                "inactive" | "false" => Some(StatusLabel::Inactive),
                "pending" => Some(StatusLabel::Pending),
                "completed" => Some(StatusLabel::Completed),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusLabel::Active => "Active",
            StatusLabel::Inactive => "Inactive",
            StatusLabel::Pending => "Pending",
            StatusLabel::Completed => "Completed",
        }
    }

    pub fn tag(&self) -> StatusTag {
        match self {
            StatusLabel::Active => StatusTag::Success,
            StatusLabel::Inactive => StatusTag::Danger,
            StatusLabel::Pending => StatusTag::Warning,
            StatusLabel::Completed => StatusTag::Info,
        }
    }
}

/// A formatted cell ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
    pub text: String,
    pub tag: Option<StatusTag>,
}

impl DisplayCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }

    pub fn tagged(text: impl Into<String>, tag: StatusTag) -> Self {
        Self {
            text: text.into(),
            tag: Some(tag),
        }
    }
}

/// Locale-independent formatting settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub not_available: String,
    pub currency_symbol: String,
    pub currency_decimals: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            not_available: NOT_AVAILABLE.to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

/// Formats raw cell values according to their semantic type
#[derive(Debug, Clone, Default)]
pub struct ValueFormatter {
    options: FormatOptions,
}

impl ValueFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn not_available(&self) -> DisplayCell {
        DisplayCell::text(self.options.not_available.clone())
    }

    pub fn format(&self, value: Option<&CellValue>, semantic_type: SemanticType) -> DisplayCell {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => return self.not_available(),
        };

        match semantic_type {
            SemanticType::Text => DisplayCell::text(value.string_form()),
            SemanticType::Number => DisplayCell::text(format_number(value)),
            SemanticType::Date => DisplayCell::text(format_date(value, DATE_FORMAT)),
            SemanticType::DateTime => DisplayCell::text(format_date(value, DATETIME_FORMAT)),
            SemanticType::Currency => DisplayCell::text(self.format_currency(value)),
            SemanticType::Percentage => DisplayCell::text(format!("{}%", value.string_form())),
            SemanticType::Status => match StatusLabel::from_value(value) {
                Some(status) => DisplayCell::tagged(status.label(), status.tag()),
                None => self.not_available(),
            },
            SemanticType::Uppercase => DisplayCell::text(value.string_form().to_uppercase()),
            SemanticType::Lowercase => DisplayCell::text(value.string_form().to_lowercase()),
            SemanticType::Phone => DisplayCell::text(format_phone(&value.string_form())),
        }
    }

    fn format_currency(&self, value: &CellValue) -> String {
        let Some(amount) = numeric_value(value) else {
            return value.string_form();
        };
        if !amount.is_finite() {
            return value.string_form();
        }

        let decimals = self.options.currency_decimals.min(MAX_CURRENCY_DECIMALS);
        let fixed = format!("{:.*}", decimals, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut out = String::new();
        if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
            out.push('-');
        }
        out.push_str(&self.options.currency_symbol);
        out.push_str(&group_digits(int_part));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

/// Format with the default options
pub fn format_value(value: Option<&CellValue>, semantic_type: SemanticType) -> DisplayCell {
    ValueFormatter::default().format(value, semantic_type)
}

/// Numbers, including numeric strings
fn numeric_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::String(s) => s.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    }
}

fn format_number(value: &CellValue) -> String {
    match value {
        CellValue::Integer(i) => {
            let grouped = group_digits(&i.unsigned_abs().to_string());
            if *i < 0 {
                format!("-{}", grouped)
            } else {
                grouped
            }
        }
        other => match numeric_value(other) {
            Some(f) if f.is_finite() => {
                let plain = f.abs().to_string();
                let grouped = match plain.split_once('.') {
                    Some((int_part, frac)) => format!("{}.{}", group_digits(int_part), frac),
                    None => group_digits(&plain),
                };
                if f < 0.0 {
                    format!("-{}", grouped)
                } else {
                    grouped
                }
            }
            _ => other.string_form(),
        },
    }
}

/// Insert thousands separators into a run of ASCII digits
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

enum ParsedDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

fn parse_date(value: &CellValue) -> Option<ParsedDate> {
    match value {
        CellValue::Date(d) => Some(ParsedDate::Date(*d)),
        CellValue::DateTime(dt) => Some(ParsedDate::DateTime(*dt)),
        CellValue::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<ParsedDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedDate::DateTime(dt.naive_local()));
    }

    const DATETIME_INPUTS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for pattern in DATETIME_INPUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(ParsedDate::DateTime(dt));
        }
    }

    for pattern in ["%Y-%m-%d", DATE_FORMAT] {
        if let Ok(d) = NaiveDate::parse_from_str(s, pattern) {
            return Some(ParsedDate::Date(d));
        }
    }

    None
}

fn format_date(value: &CellValue, pattern: &str) -> String {
    match parse_date(value) {
        Some(ParsedDate::Date(d)) => match d.and_hms_opt(0, 0, 0) {
            Some(midnight) => midnight.format(pattern).to_string(),
            None => d.format(DATE_FORMAT).to_string(),
        },
        Some(ParsedDate::DateTime(dt)) => dt.format(pattern).to_string(),
        None => value.string_form(),
    }
}

/// Group a 10-digit phone number as `(XXX) XXX-XXXX`.
/// Anything else passes through unchanged.
fn format_phone(raw: &str) -> String {
    let digits = PHONE_SEPARATORS.replace_all(raw, "");
    if digits.len() != PHONE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return raw.to_string();
    }
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: CellValue, ty: SemanticType) -> String {
        format_value(Some(&value), ty).text
    }

    #[test]
    fn test_null_and_missing_render_marker() {
        let all = [
            SemanticType::Text,
            SemanticType::Number,
            SemanticType::Date,
            SemanticType::DateTime,
            SemanticType::Currency,
            SemanticType::Percentage,
            SemanticType::Status,
            SemanticType::Uppercase,
            SemanticType::Lowercase,
            SemanticType::Phone,
        ];
        for ty in all {
            assert_eq!(format_value(None, ty).text, NOT_AVAILABLE);
            assert_eq!(format_value(Some(&CellValue::Null), ty).text, NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_number_grouping() {
        assert_eq!(fmt(CellValue::Integer(1234567), SemanticType::Number), "1,234,567");
        assert_eq!(fmt(CellValue::Integer(-1000), SemanticType::Number), "-1,000");
        assert_eq!(fmt(CellValue::Integer(999), SemanticType::Number), "999");
        assert_eq!(fmt(CellValue::Float(1234.5), SemanticType::Number), "1,234.5");
        assert_eq!(fmt(CellValue::from("25000"), SemanticType::Number), "25,000");
        assert_eq!(fmt(CellValue::from("heavy"), SemanticType::Number), "heavy");
    }

    #[test]
    fn test_dates() {
        assert_eq!(fmt(CellValue::from("2024-03-07"), SemanticType::Date), "07/03/2024");
        assert_eq!(
            fmt(CellValue::from("2024-03-07T14:05:09"), SemanticType::DateTime),
            "07/03/2024 14:05"
        );
        assert_eq!(
            fmt(CellValue::from("2024-03-07T14:05:09.250Z"), SemanticType::Date),
            "07/03/2024"
        );
        assert_eq!(
            fmt(CellValue::from("2024-03-07"), SemanticType::DateTime),
            "07/03/2024 00:00"
        );
        assert_eq!(fmt(CellValue::from("someday"), SemanticType::Date), "someday");
    }

    #[test]
    fn test_currency() {
        assert_eq!(fmt(CellValue::Integer(1500), SemanticType::Currency), "$1,500.00");
        assert_eq!(fmt(CellValue::Float(-12.5), SemanticType::Currency), "-$12.50");
        assert_eq!(fmt(CellValue::from("n/d"), SemanticType::Currency), "n/d");

        let formatter = ValueFormatter::new(FormatOptions {
            currency_symbol: "COP ".to_string(),
            currency_decimals: 0,
            ..FormatOptions::default()
        });
        assert_eq!(
            formatter
                .format(Some(&CellValue::Integer(2500000)), SemanticType::Currency)
                .text,
            "COP 2,500,000"
        );

        let formatter = ValueFormatter::new(FormatOptions {
            currency_decimals: usize::MAX,
            ..FormatOptions::default()
        });
        assert_eq!(
            formatter
                .format(Some(&CellValue::Float(1.5)), SemanticType::Currency)
                .text,
            "$1.500000"
        );
    }

    #[test]
    fn test_percentage_is_not_scaled() {
        assert_eq!(fmt(CellValue::Integer(12), SemanticType::Percentage), "12%");
        assert_eq!(fmt(CellValue::Float(0.5), SemanticType::Percentage), "0.5%");
    }

    #[test]
    fn test_status_labels() {
        let active = format_value(Some(&CellValue::Boolean(true)), SemanticType::Status);
        assert_eq!(active, DisplayCell::tagged("Active", StatusTag::Success));
        let pending = format_value(Some(&CellValue::from(" PENDING ")), SemanticType::Status);
        assert_eq!(pending, DisplayCell::tagged("Pending", StatusTag::Warning));
        let unknown = format_value(Some(&CellValue::from("sold")), SemanticType::Status);
        assert_eq!(unknown, DisplayCell::text(NOT_AVAILABLE));
    }

    #[test]
    fn test_phone() {
        assert_eq!(fmt(CellValue::from("3001234567"), SemanticType::Phone), "(300) 123-4567");
        assert_eq!(fmt(CellValue::from("300-123-4567"), SemanticType::Phone), "(300) 123-4567");
        assert_eq!(fmt(CellValue::Integer(3001234567), SemanticType::Phone), "(300) 123-4567");
        assert_eq!(fmt(CellValue::from("12345"), SemanticType::Phone), "12345");
        assert_eq!(fmt(CellValue::from("+57 300 123 4567"), SemanticType::Phone), "+57 300 123 4567");
    }

    #[test]
    fn test_case_transforms() {
        assert_eq!(fmt(CellValue::from("Lot b"), SemanticType::Uppercase), "LOT B");
        assert_eq!(fmt(CellValue::from("Lot B"), SemanticType::Lowercase), "lot b");
    }

    #[test]
    fn test_semantic_type_parsing() {
        assert_eq!(SemanticType::from("Currency"), SemanticType::Currency);
        assert_eq!(SemanticType::from("boolean"), SemanticType::Status);
        assert_eq!(SemanticType::from("sparkline"), SemanticType::Text);
    }
}
