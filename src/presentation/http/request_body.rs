use serde_json::{Map, Value};

use crate::application::services::tagging::{normalize_tag_names, split_tag_list};

/// Decodes a write body into a field map. JSON is used when the content type
/// says so, everything else is read as `application/x-www-form-urlencoded`.
/// Unparsable or non-object JSON yields an empty map.
pub fn decode_fields(content_type: Option<&str>, body: &[u8]) -> Map<String, Value> {
    let is_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    if is_json {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    } else {
        decode_form(body)
    }
}

// `tags[]=a&tags[]=b` collects into an array; a plain key keeps its last value.
// Bytes that are not UTF-8 after percent-decoding are replaced, never dropped.
fn decode_form(body: &[u8]) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in form_urlencoded::parse(body) {
        let value = Value::String(value.into_owned());
        if let Some(base) = key.strip_suffix("[]") {
            let entry = out
                .entry(base.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            match entry {
                Value::Array(items) => items.push(value),
                other => *other = Value::Array(vec![value]),
            }
        } else {
            out.insert(key.into_owned(), value);
        }
    }
    out
}

/// Write payload after coercion. A field is `Some` whenever its key was present,
/// even if the value was null or of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityPayload {
    pub name: Option<String>,
    pub location_id: Option<i64>,
    pub tags: Option<Vec<String>>,
}

impl FacilityPayload {
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            name: fields.get("name").map(coerce_name),
            location_id: fields.get("location_id").map(coerce_location_id),
            tags: fields.get("tags").map(coerce_tags),
        }
    }
}

fn coerce_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

fn truncate_float(f: f64) -> i64 {
    if f.is_finite() { f.trunc() as i64 } else { 0 }
}

fn coerce_location_id(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(truncate_float))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(truncate_float))
                .unwrap_or(0)
        }
        Value::Bool(true) => 1,
        _ => 0,
    }
}

fn coerce_tags(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_tag_list(s),
        Value::Array(items) => normalize_tag_names(items.iter().filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })),
        _ => Vec::new(),
    }
}
