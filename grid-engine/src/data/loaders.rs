//! Record loaders for JSON and CSV files
//!
//! Both loaders produce `serde_json::Value` objects, which implement
//! `GridRecord` directly. Field names are reported in file order: the CSV
//! header, or the first-seen key order across JSON records.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use crate::data::type_inference::TypeInference;

/// Records read from a file, plus their field names in file order
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub fields: Vec<String>,
    pub records: Vec<JsonValue>,
}

impl LoadedRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load by file extension (`.json` or `.csv`)
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<LoadedRecords> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => load_json_records(path),
        "csv" => load_csv_records(path),
        other => bail!(
            "Unsupported file type '{}' for {}: expected .json or .csv",
            other,
            path.display()
        ),
    }
}

/// Load a JSON array of objects, or an object wrapping one under `data`
pub fn load_json_records<P: AsRef<Path>>(path: P) -> Result<LoadedRecords> {
    let path = path.as_ref();
    info!("Loading JSON records from {}", path.display());

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let value: JsonValue = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let rows = match value {
        JsonValue::Array(rows) => rows,
        JsonValue::Object(mut obj) => match obj.remove("data") {
            Some(JsonValue::Array(rows)) => rows,
            _ => bail!("Expected a JSON array or an object with a 'data' array"),
        },
        _ => bail!("Expected a JSON array or an object with a 'data' array"),
    };

    let mut fields: Vec<String> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| anyhow!("Record {} is not a JSON object", idx))?;
        for key in obj.keys() {
            if !fields.iter().any(|f| f == key) {
                fields.push(key.clone());
            }
        }
    }

    info!("Loaded {} JSON records with {} fields", rows.len(), fields.len());
    Ok(LoadedRecords {
        fields,
        records: rows,
    })
}

/// Load a CSV file with a header row. Fields are typed per value:
/// empty becomes null, then booleans, integers and floats; the rest are strings.
pub fn load_csv_records<P: AsRef<Path>>(path: P) -> Result<LoadedRecords> {
    let path = path.as_ref();
    info!("Loading CSV records from {}", path.display());

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Bad CSV row {} in {}", line + 1, path.display()))?;
        let mut obj = Map::with_capacity(headers.len());
        for (header, field) in headers.iter().zip(row.iter()) {
            obj.insert(header.clone(), TypeInference::to_json_value(field));
        }
        records.push(JsonValue::Object(obj));
    }

    debug!("CSV headers: {:?}", headers);
    info!("Loaded {} CSV records with {} fields", records.len(), headers.len());
    Ok(LoadedRecords {
        fields: headers,
        records,
    })
}
