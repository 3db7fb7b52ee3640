//! JSON schema fragments describing the values a selector accepts

use crate::Selector;
use serde_json::{json, Value};

/// A string or a list of strings, the shape of id fields
fn id_or_ids(pattern: Option<String>) -> Value {
    let mut item = json!({"type": "string"});
    if let Some(pattern) = pattern {
        item["pattern"] = Value::String(pattern);
    }
    json!({
        "anyOf": [
            item.clone(),
            {"type": "array", "items": item}
        ]
    })
}

/// Schema of a selector type regardless of its options
fn type_schema(selector_type: &str) -> Value {
    match selector_type {
        "entity" | "device" | "area" => id_or_ids(None),
        "number" => json!({"type": "number"}),
        "addon" | "text" | "select" => json!({"type": "string"}),
        "boolean" => json!({"type": "boolean"}),
        "time" => json!({
            "type": "string",
            "pattern": "^\\d{1,2}:\\d{2}(:\\d{2})?$",
        }),
        "target" => json!({"type": "object"}),
        "action" => json!({"type": ["array", "object"]}),
        _ => json!({}),
    }
}

impl Selector {
    /// Schema of the values a field with this selector accepts
    ///
    /// Templates are not considered; callers that accept templated data
    /// should skip validation for such values.
    pub fn value_schema(&self) -> Value {
        match self {
            Selector::Entity(config) => {
                let pattern = config
                    .domain
                    .as_ref()
                    .map(|domain| format!("^{}\\.[a-z0-9_]+$", regex::escape(domain)));
                id_or_ids(pattern)
            }
            Selector::Number(config) => json!({
                "type": "number",
                "minimum": config.min,
                "maximum": config.max,
            }),
            Selector::Select(config) => json!({
                "type": "string",
                "enum": config.options,
            }),
            other => type_schema(other.selector_type()),
        }
    }
}
