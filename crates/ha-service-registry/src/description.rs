//! Service descriptors as declared in `services.yaml`

use crate::error::ServiceError;
use ha_core::ServiceKey;
use ha_selector::{Selector, TargetSelectorConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Keys a service call may carry when the service accepts a target
pub const TARGET_KEYS: &[&str] = &["entity_id", "device_id", "area_id"];

/// `target:` with no value means "any target"
fn null_as_any_target<'de, D>(deserializer: D) -> Result<Option<TargetSelectorConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let target = Option::<TargetSelectorConfig>::deserialize(deserializer)?;
    Ok(Some(target.unwrap_or_default()))
}

/// A typed input field of a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescription {
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Legacy list of accepted values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
    #[serde(default)]
    pub required: bool,
    /// Only shown in advanced mode
    #[serde(default)]
    pub advanced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
}

/// Shape of one entry in `services.yaml` before the fields are parsed
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawService {
    #[serde(default)]
    name: Option<String>,
    description: String,
    #[serde(default, deserialize_with = "null_as_any_target")]
    target: Option<TargetSelectorConfig>,
    #[serde(default)]
    fields: Option<IndexMap<String, Value>>,
}

/// Information about a described service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDescription {
    /// Domain the service belongs to
    #[serde(skip)]
    pub domain: String,
    /// Service name
    #[serde(skip)]
    pub service: String,
    /// Human-readable label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description of what the service does
    pub description: String,
    /// Entities the service can target, `None` when it takes no target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSelectorConfig>,
    /// Input fields in declaration order
    pub fields: IndexMap<String, FieldDescription>,
}

impl ServiceDescription {
    /// Parse one service entry of a `services.yaml` document
    pub fn from_value(domain: &str, service: &str, value: &Value) -> Result<Self, ServiceError> {
        let key = ServiceKey::new(domain, service).map_err(|e| ServiceError::InvalidName {
            service: service.to_string(),
            reason: e.to_string(),
        })?;

        let invalid = |reason: String| ServiceError::InvalidDescriptor {
            domain: domain.to_string(),
            service: service.to_string(),
            reason,
        };

        let raw: RawService =
            serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;

        let mut fields = IndexMap::new();
        for (field_name, field_value) in raw.fields.unwrap_or_default() {
            let field: FieldDescription = serde_json::from_value(field_value)
                .map_err(|e| invalid(format!("field '{}': {}", field_name, e)))?;
            fields.insert(field_name, field);
        }

        Ok(Self {
            domain: key.domain().to_string(),
            service: key.service().to_string(),
            name: raw.name,
            description: raw.description,
            target: raw.target,
            fields,
        })
    }

    /// `domain.service`
    pub fn key(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }

    /// Names of the fields that must be present in a call
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.required)
            .map(|(name, _)| name.as_str())
    }

    /// JSON schema of the data a call to this service may carry
    pub fn data_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();

        for (name, field) in &self.fields {
            let schema = field
                .selector
                .as_ref()
                .map(Selector::value_schema)
                .unwrap_or_else(|| json!({}));
            properties.insert(name.clone(), schema);
        }

        if self.target.is_some() {
            for key in TARGET_KEYS {
                properties
                    .entry(key.to_string())
                    .or_insert_with(|| json!({"anyOf": [
                        {"type": "string"},
                        {"type": "array", "items": {"type": "string"}}
                    ]}));
            }
        }

        let required: Vec<&str> = self.required_fields().collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_image() -> Value {
        json!({
            "name": "Capture image",
            "description": "Request a new image capture from a camera device.",
            "target": {"entity": {"integration": "abode", "domain": "camera"}},
            "fields": {
                "quality": {
                    "name": "Quality",
                    "description": "JPEG quality.",
                    "required": true,
                    "default": 80,
                    "selector": {"number": {"min": 1, "max": 100}}
                },
                "format": {
                    "description": "Image format.",
                    "selector": {"select": {"options": ["jpeg", "png"]}}
                }
            }
        })
    }

    #[test]
    fn test_parse_full_descriptor() {
        let desc =
            ServiceDescription::from_value("abode", "capture_image", &capture_image()).unwrap();
        assert_eq!(desc.key(), "abode.capture_image");
        assert_eq!(desc.name.as_deref(), Some("Capture image"));
        let entity = desc.target.as_ref().and_then(|t| t.entity.as_ref());
        assert_eq!(entity.and_then(|e| e.domain.as_deref()), Some("camera"));
        let names: Vec<&str> = desc.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["quality", "format"]);
        assert_eq!(desc.required_fields().collect::<Vec<_>>(), vec!["quality"]);
    }

    #[test]
    fn test_null_target_means_any_target() {
        let desc = ServiceDescription::from_value(
            "demo",
            "refresh",
            &json!({"description": "Refresh.", "target": null}),
        )
        .unwrap();
        assert_eq!(desc.target, Some(TargetSelectorConfig::default()));

        let desc =
            ServiceDescription::from_value("demo", "refresh", &json!({"description": "Refresh."}))
                .unwrap();
        assert_eq!(desc.target, None);
    }

    #[test]
    fn test_description_is_required() {
        let err = ServiceDescription::from_value("demo", "refresh", &json!({"name": "Refresh"}))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDescriptor { .. }));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_field_error_names_the_field() {
        let err = ServiceDescription::from_value(
            "demo",
            "set_level",
            &json!({
                "description": "Set level.",
                "fields": {
                    "level": {
                        "description": "Level.",
                        "selector": {"number": {"min": 10, "max": 1}}
                    }
                }
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("field 'level'"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = ServiceDescription::from_value(
            "demo",
            "refresh",
            &json!({"description": "Refresh.", "icon": "mdi:refresh"}),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_invalid_service_name() {
        let err =
            ServiceDescription::from_value("demo", "Refresh-Now", &json!({"description": "x"}))
                .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidName { .. }));
    }

    #[test]
    fn test_data_schema() {
        let desc =
            ServiceDescription::from_value("abode", "capture_image", &capture_image()).unwrap();
        let schema = desc.data_schema();
        assert_eq!(schema["required"], json!(["quality"]));
        assert_eq!(schema["properties"]["quality"]["maximum"], json!(100.0));
        assert_eq!(schema["properties"]["format"]["enum"], json!(["jpeg", "png"]));
        assert!(schema["properties"].get("entity_id").is_some());
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
