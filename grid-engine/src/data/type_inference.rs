//! Shared type inference logic for data loaders
//!
//! Used by the CSV loader to turn raw fields into typed JSON values, and by
//! the command-line front end to pick a semantic type for columns that were
//! not declared in the configuration.

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;

use crate::data::cell_value::CellValue;
use crate::grid::formatter::{SemanticType, StatusLabel};

/// Static compiled regex patterns for date detection
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // YYYY-MM-DD (year must be 19xx or 20xx, month 01-12, day 01-31)
        Regex::new(r"^(19|20)\d{2}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap(),
        // DD/MM/YYYY
        Regex::new(r"^(0[1-9]|[12]\d|3[01])/(0[1-9]|1[0-2])/(19|20)\d{2}$").unwrap(),
    ]
});

static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)\d{2}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])[T ]\d{2}:\d{2}(:\d{2})?")
        .unwrap()
});

/// Detected data type for a value or column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    Boolean,
    Integer,
    Float,
    Date,
    DateTime,
    String,
    Null,
}

/// Type inference utilities
pub struct TypeInference;

impl TypeInference {
    /// Infer the type of a single string value
    ///
    /// Order of checks is important: booleans and numbers are cheap
    /// string parses, the date regexes run last.
    pub fn infer_from_string(value: &str) -> InferredType {
        if value.is_empty() {
            return InferredType::Null;
        }

        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            return InferredType::Boolean;
        }

        if value.parse::<i64>().is_ok() {
            return InferredType::Integer;
        }

        if value.parse::<f64>().is_ok() {
            return InferredType::Float;
        }

        if value.len() >= 8 && value.len() <= 35 {
            if DATETIME_PATTERN.is_match(value) {
                return InferredType::DateTime;
            }
            if DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value)) {
                return InferredType::Date;
            }
        }

        InferredType::String
    }

    /// Merge two types when a column has mixed types
    ///
    /// Rules:
    /// - Same type -> keep it
    /// - Null with anything -> the other type
    /// - Integer + Float -> Float
    /// - Date + DateTime -> DateTime
    /// - Everything else -> String
    pub fn merge_types(type1: InferredType, type2: InferredType) -> InferredType {
        use InferredType::*;

        match (type1, type2) {
            (t1, t2) if t1 == t2 => t1,
            (Null, t) | (t, Null) => t,
            (Integer, Float) | (Float, Integer) => Float,
            (Date, DateTime) | (DateTime, Date) => DateTime,
            _ => String,
        }
    }

    /// Infer type from multiple sample values
    pub fn infer_from_samples<'a, I>(values: I) -> InferredType
    where
        I: Iterator<Item = &'a str>,
    {
        let mut result_type = InferredType::Null;

        for value in values {
            let value_type = Self::infer_from_string(value);
            result_type = Self::merge_types(result_type, value_type);

            // Early exit if we've degraded to String
            if result_type == InferredType::String {
                break;
            }
        }

        result_type
    }

    /// Default semantic type for a column of the given inferred type
    pub fn semantic_type_for(inferred: InferredType) -> SemanticType {
        match inferred {
            InferredType::Integer | InferredType::Float => SemanticType::Number,
            InferredType::Boolean => SemanticType::Status,
            InferredType::Date => SemanticType::Date,
            InferredType::DateTime => SemanticType::DateTime,
            InferredType::String | InferredType::Null => SemanticType::Text,
        }
    }

    /// Infer the type of an already-typed cell. Strings that hold numbers
    /// or booleans stay strings: the source chose to quote them.
    pub fn infer_from_cell(value: &CellValue) -> InferredType {
        match value {
            CellValue::Null => InferredType::Null,
            CellValue::Boolean(_) => InferredType::Boolean,
            CellValue::Integer(_) => InferredType::Integer,
            CellValue::Float(_) => InferredType::Float,
            CellValue::Date(_) => InferredType::Date,
            CellValue::DateTime(_) => InferredType::DateTime,
            CellValue::String(s) => match Self::infer_from_string(s) {
                InferredType::Date => InferredType::Date,
                InferredType::DateTime => InferredType::DateTime,
                InferredType::Null => InferredType::Null,
                _ => InferredType::String,
            },
        }
    }

    /// Semantic type for a column from sample cells. A text column whose
    /// values are all status labels is a status column.
    pub fn semantic_type_for_cells<'a, I>(values: I) -> SemanticType
    where
        I: Iterator<Item = &'a CellValue>,
    {
        let mut inferred = InferredType::Null;
        let mut all_status = true;
        let mut any_value = false;

        for value in values {
            inferred = Self::merge_types(inferred, Self::infer_from_cell(value));
            if !value.is_null() {
                any_value = true;
                all_status &= StatusLabel::from_value(value).is_some();
            }
        }

        if inferred == InferredType::String && any_value && all_status {
            return SemanticType::Status;
        }
        Self::semantic_type_for(inferred)
    }

    /// Convert a raw text field into a typed JSON value.
    /// Dates stay strings; the formatter parses them on display.
    pub fn to_json_value(field: &str) -> JsonValue {
        match Self::infer_from_string(field) {
            InferredType::Null => JsonValue::Null,
            InferredType::Boolean => JsonValue::Bool(field.eq_ignore_ascii_case("true")),
            InferredType::Integer => field
                .parse::<i64>()
                .map(JsonValue::from)
                .unwrap_or_else(|_| JsonValue::String(field.to_string())),
            InferredType::Float => field
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(field.to_string())),
            _ => JsonValue::String(field.to_string()),
        }
    }
}
