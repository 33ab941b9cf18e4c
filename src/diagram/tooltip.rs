//! Hover metadata: a JSON object stored in an element's `data-tooltip` attribute.

use serde_json::Value;

/// Parse hover metadata into display rows, keeping the object's key order.
///
/// Anything other than a JSON object yields no rows. String values are shown without quotes;
/// other values use their JSON text.
pub fn parse_tooltip(raw: &str) -> Vec<(String, String)> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect(),
        _ => Vec::new(),
    }
}
