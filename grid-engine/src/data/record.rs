//! Record access traits for the grid engine
//!
//! The engine is generic over the shape of a row. A record only has to
//! resolve a column accessor to a raw [`CellValue`]; everything else
//! (filtering, sorting, formatting, selection) is driven by that lookup.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::cell_value::CellValue;

/// Field read by the default key extractor
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Core trait for read-only access to one row of application data
pub trait GridRecord {
    /// Resolve an accessor to the raw value of a cell.
    /// Returns None when the record has no such field.
    fn field(&self, accessor: &str) -> Option<CellValue>;
}

/// Stable identity of a row, used for selection tracking
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RowKey {
    Number(i64),
    Text(String),
}

impl RowKey {
    /// Build a key from a raw cell value.
    /// Only integers and non-empty strings identify a row.
    pub fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Integer(i) => Some(RowKey::Number(*i)),
            CellValue::String(s) if !s.is_empty() => Some(RowKey::Text(s.clone())),
            _ => None,
        }
    }

    /// Parse a key typed by a user: integers become `Number`, the rest `Text`
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(RowKey::Number)
            .unwrap_or_else(|_| RowKey::Text(raw.to_string()))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Number(n) => write!(f, "{}", n),
            RowKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        RowKey::Number(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::Text(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey::Text(s)
    }
}

/// Derives the selection key of a record
pub type KeyExtractor<R> = Arc<dyn Fn(&R) -> Option<RowKey>>;

/// Key extractor reading the record's `id` field
pub fn default_key_extractor<R: GridRecord + 'static>() -> KeyExtractor<R> {
    Arc::new(|record: &R| {
        record
            .field(DEFAULT_KEY_FIELD)
            .and_then(|value| RowKey::from_value(&value))
    })
}

/// Key extractor reading an arbitrary field
pub fn field_key_extractor<R: GridRecord + 'static>(field: impl Into<String>) -> KeyExtractor<R> {
    let field = field.into();
    Arc::new(move |record: &R| {
        record
            .field(&field)
            .and_then(|value| RowKey::from_value(&value))
    })
}

impl GridRecord for JsonValue {
    /// Dotted accessors (`supplier.name`) walk nested objects
    fn field(&self, accessor: &str) -> Option<CellValue> {
        let mut current = self;
        for segment in accessor.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(CellValue::from(current))
    }
}

impl GridRecord for HashMap<String, CellValue> {
    fn field(&self, accessor: &str) -> Option<CellValue> {
        self.get(accessor).cloned()
    }
}

impl GridRecord for BTreeMap<String, CellValue> {
    fn field(&self, accessor: &str) -> Option<CellValue> {
        self.get(accessor).cloned()
    }
}

impl<R: GridRecord + ?Sized> GridRecord for &R {
    fn field(&self, accessor: &str) -> Option<CellValue> {
        (**self).field(accessor)
    }
}
