//! Normalization of build errors reported by external tools.
//!
//! Bundlers report errors in different shapes: some carry `file`, `line` and
//! `column`, others an `id` plus a nested `loc: { line, column }`. The overlay
//! template only needs a uniform `{ file, line, column, location }` record,
//! with every other reported field passed through untouched.

use serde::Serialize;
use serde_json::{Map, Value};

/// File name used when the error does not say where it happened.
pub const UNKNOWN_FILE: &str = "unknown";

/// A build error reduced to a uniform location record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedError {
    /// Source file, or [`UNKNOWN_FILE`]
    pub file: String,
    /// 1-based line, when reported
    pub line: Option<u64>,
    /// 1-based column, when reported
    pub column: Option<u64>,
    /// Human-readable location (`file (line:column)`)
    pub location: String,
    /// Every other field of the raw record
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl NormalizedError {
    /// Merge the normalized fields over the raw record.
    ///
    /// This is the value tree the overlay template is expanded against, so
    /// `${message}` or `${frame}` keep working next to `${location}`.
    pub fn to_value(&self) -> Value {
        let mut merged = self.extra.clone();
        merged.insert("file".to_string(), Value::from(self.file.clone()));
        merged.insert("line".to_string(), self.line.map_or(Value::Null, Value::from));
        merged.insert(
            "column".to_string(),
            self.column.map_or(Value::Null, Value::from),
        );
        merged.insert("location".to_string(), Value::from(self.location.clone()));
        Value::Object(merged)
    }
}

/// Normalize a raw error record.
///
/// Never fails: absent or mistyped fields simply come out as `None` or
/// [`UNKNOWN_FILE`]. A non-object `raw` is treated as an empty record.
pub fn normalize(raw: &Value) -> NormalizedError {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    let file = non_empty_str(record.get("file"))
        .or_else(|| non_empty_str(record.get("id")))
        .map(str::to_owned);

    // `loc` is only consulted when the record also carries a `log` entry.
    let nested = |key: &str| {
        record
            .get("log")
            .filter(|log| is_present(log))
            .and_then(|_| record.get("loc"))
            .and_then(|loc| loc.get(key))
            .and_then(as_position)
    };
    let line = record.get("line").and_then(as_position).or_else(|| nested("line"));
    let column = record
        .get("column")
        .and_then(as_position)
        .or_else(|| nested("column"));

    let location = match &file {
        None => UNKNOWN_FILE.to_string(),
        Some(file) if line.is_none() && column.is_none() => file.clone(),
        Some(file) => format!(
            "{} ({}:{})",
            file,
            line.unwrap_or_default(),
            column.unwrap_or_default()
        ),
    };

    let mut extra = record.clone();
    for key in ["file", "line", "column", "location"] {
        extra.remove(key);
    }

    NormalizedError {
        file: file.unwrap_or_else(|| UNKNOWN_FILE.to_string()),
        line,
        column,
        location,
        extra,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn as_position(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
