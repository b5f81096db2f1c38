//! Debug capture for the run's debug target and the value formatter used by result nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::NodeId;
use crate::value::Value;

/// Nesting depth beyond which a value is reported as complex.
const COMPLEX_DEPTH: usize = 3;

/// Observability summary of a value. Never feeds back into evaluation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueSummary {
    pub value_type: String,
    pub formatted: String,
    /// Length in bytes of the compact JSON encoding.
    pub size_estimate: usize,
    pub depth: usize,
    pub is_complex: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebugEntry {
    pub node_id: NodeId,
    pub node_name: String,
    /// `None` when the node had nothing connected.
    pub source: Option<NodeId>,
    pub summary: ValueSummary,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DebugLog {
    pub entries: Vec<DebugEntry>,
}

impl DebugLog {
    pub fn push(&mut self, entry: DebugEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "number",
        Value::Boolean(_) => "boolean",
        Value::Text(_) => "string",
        Value::Objects(_) => "array",
        Value::Scene(_) => "scene",
        Value::Json(json) => json_type(json),
        Value::Empty => "empty",
    }
}

fn json_type(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn depth(json: &JsonValue) -> usize {
    match json {
        JsonValue::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        JsonValue::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn more_suffix(total: usize, shown: usize) -> String {
    if total > shown {
        format!(", ... ({} more)", total - shown)
    } else {
        String::new()
    }
}

/// One-line rendering: scalars verbatim, arrays and objects cut to `preview` items/keys.
pub fn format_json(json: &JsonValue, preview: usize) -> String {
    match json {
        JsonValue::Array(items) => {
            let shown: Vec<String> = items
                .iter()
                .take(preview)
                .map(|item| match item {
                    JsonValue::Array(inner) => format!("[{} items]", inner.len()),
                    JsonValue::Object(map) => match map.get("id").and_then(JsonValue::as_str) {
                        Some(id) => format!("{{id: {id}}}"),
                        None => format!("{{{} keys}}", map.len()),
                    },
                    scalar => scalar.to_string(),
                })
                .collect();
            format!(
                "[{}{}]",
                shown.join(", "),
                more_suffix(items.len(), shown.len())
            )
        }
        JsonValue::Object(map) => {
            let shown: Vec<&str> = map.keys().take(preview).map(String::as_str).collect();
            format!("{{{}{}}}", shown.join(", "), more_suffix(map.len(), shown.len()))
        }
        scalar => scalar.to_string(),
    }
}

pub fn summarize(value: &Value, preview: usize) -> ValueSummary {
    let json = value.to_json();
    let depth = depth(&json);
    let formatted = match value {
        Value::Empty => "<no input>".to_string(),
        _ => format_json(&json, preview),
    };
    ValueSummary {
        value_type: type_label(value).to_string(),
        formatted,
        size_estimate: json.to_string().len(),
        depth,
        is_complex: depth > COMPLEX_DEPTH,
    }
}
