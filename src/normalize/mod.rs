// src/normalize/mod.rs
use serde_json::{Map, Number, Value};

/// One parsed CSV line: column name → cleaned value, in source column order.
/// Uses `serde_json::Map` (with `preserve_order`) so the writer can take its
/// header from the first record's key order.
pub type RawRow = Map<String, Value>;

/// Reserved key under which the reader attaches the 1-based record number.
pub const RECORD_NUMBER_KEY: &str = "number";

/// Clean and convert one raw CSV cell into a typed value.
///
/// - Empty or whitespace-only cells become null.
/// - Every comma is replaced with a period before parsing (the source files
///   use a comma decimal separator). This also means thousands-separated
///   input like `"1,234"` parses as the float `1.234`; that lossy behavior
///   must stay as-is for compatibility with already-stored data.
/// - A cleaned cell containing a period parses as `f64`, otherwise as `i64`.
/// - Anything unparseable is returned as the cleaned text.
pub fn clean_value(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }

    let cleaned = raw.replace(',', ".").trim().to_string();

    if cleaned.contains('.') {
        if let Ok(f) = cleaned.parse::<f64>() {
            if let Some(n) = Number::from_f64(f) {
                return Value::Number(n);
            }
        }
    } else if let Ok(i) = cleaned.parse::<i64>() {
        return Value::Number(Number::from(i));
    }

    Value::String(cleaned)
}

/// Render a cleaned value back to its cell text. Null renders as the empty
/// string; everything else uses its default text representation.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
