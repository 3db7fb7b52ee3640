//! Selectors for service fields
//!
//! A selector is a typed input-widget specification attached to a service
//! field, e.g. `{"number": {"min": 0, "max": 100}}`. This crate holds the
//! registry of known selector types and validates selector configurations
//! into a typed [`Selector`].
//!
//! # Example
//!
//! ```ignore
//! use ha_selector::validate_selector;
//! use serde_json::json;
//!
//! let selector = validate_selector(&json!({"select": {"options": ["away", "home"]}}))?;
//! assert_eq!(selector.selector_type(), "select");
//! ```

mod config;
mod error;
mod schema;

pub use config::{
    DeviceFilter, DeviceSelectorConfig, EmptyConfig, EntitySelectorConfig, NumberMode,
    NumberSelectorConfig, SelectSelectorConfig, TargetSelectorConfig, TextSelectorConfig,
    MIN_NUMBER_STEP,
};
pub use error::{SelectorError, SelectorResult};

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::trace;

/// Registered selector types
pub const SELECTOR_TYPES: &[&str] = &[
    "entity", "device", "area", "number", "addon", "boolean", "time", "target", "action",
    "object", "text", "select",
];

/// Check if a selector type is registered
pub fn is_registered(selector_type: &str) -> bool {
    registered_name(selector_type).is_some()
}

fn registered_name(selector_type: &str) -> Option<&'static str> {
    SELECTOR_TYPES.iter().copied().find(|t| *t == selector_type)
}

/// A validated selector
///
/// Serializes back to the single-key mapping form. Configured selectors get
/// their defaults filled in; a selector given without options stays empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// A registered type written without options, e.g. `text:`
    Unconfigured(&'static str),
    /// A single entity
    Entity(EntitySelectorConfig),
    /// A single device
    Device(DeviceSelectorConfig),
    /// A single area
    Area(TargetSelectorConfig),
    /// A numeric value
    Number(NumberSelectorConfig),
    /// An add-on slug
    Addon(EmptyConfig),
    /// On or off
    Boolean(EmptyConfig),
    /// A time of day
    Time(EmptyConfig),
    /// Area, device or entity ids
    Target(TargetSelectorConfig),
    /// An action sequence in script syntax
    Action(EmptyConfig),
    /// An arbitrary object
    Object(EmptyConfig),
    /// A (multi-line) text string
    Text(TextSelectorConfig),
    /// A single choice out of a fixed list
    Select(SelectSelectorConfig),
}

impl Selector {
    /// The registry name of this selector's type
    pub fn selector_type(&self) -> &'static str {
        match self {
            Selector::Unconfigured(selector_type) => *selector_type,
            Selector::Entity(_) => "entity",
            Selector::Device(_) => "device",
            Selector::Area(_) => "area",
            Selector::Number(_) => "number",
            Selector::Addon(_) => "addon",
            Selector::Boolean(_) => "boolean",
            Selector::Time(_) => "time",
            Selector::Target(_) => "target",
            Selector::Action(_) => "action",
            Selector::Object(_) => "object",
            Selector::Text(_) => "text",
            Selector::Select(_) => "select",
        }
    }

    /// Serialize back to the `{type: options}` form
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.selector_type();
        match self {
            Selector::Unconfigured(_) => map.serialize_entry(key, &EmptyConfig {})?,
            Selector::Entity(config) => map.serialize_entry(key, config)?,
            Selector::Device(config) => map.serialize_entry(key, config)?,
            Selector::Area(config) | Selector::Target(config) => {
                map.serialize_entry(key, config)?
            }
            Selector::Number(config) => map.serialize_entry(key, config)?,
            Selector::Addon(config)
            | Selector::Boolean(config)
            | Selector::Time(config)
            | Selector::Action(config)
            | Selector::Object(config) => map.serialize_entry(key, config)?,
            Selector::Text(config) => map.serialize_entry(key, config)?,
            Selector::Select(config) => map.serialize_entry(key, config)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validate_selector(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_options<T: DeserializeOwned>(selector_type: &str, options: &Value) -> SelectorResult<T> {
    serde_json::from_value(options.clone())
        .map_err(|e| SelectorError::invalid(selector_type, e.to_string()))
}

/// Validate a selector configuration
///
/// The configuration must be a mapping with exactly one registered selector
/// type as its key. A `null` body is accepted for every type and is not
/// checked against the type's options.
pub fn validate_selector(config: &Value) -> SelectorResult<Selector> {
    let map = config.as_object().ok_or(SelectorError::NotAMapping)?;

    if map.is_empty() {
        return Err(SelectorError::MissingType);
    }
    if map.len() != 1 {
        return Err(SelectorError::MultipleTypes(map.keys().cloned().collect()));
    }

    let (name, options) = map.iter().next().ok_or(SelectorError::MissingType)?;
    let selector_type =
        registered_name(name).ok_or_else(|| SelectorError::UnknownType(name.clone()))?;

    if options.is_null() {
        return Ok(Selector::Unconfigured(selector_type));
    }
    trace!(selector_type, "Validating selector options");

    let selector = match selector_type {
        "entity" => Selector::Entity(parse_options(selector_type, options)?),
        "device" => Selector::Device(parse_options(selector_type, options)?),
        "area" => Selector::Area(parse_options(selector_type, options)?),
        "number" => {
            let number: NumberSelectorConfig = parse_options(selector_type, options)?;
            number
                .check()
                .map_err(|reason| SelectorError::invalid(selector_type, reason))?;
            Selector::Number(number)
        }
        "addon" => Selector::Addon(parse_options(selector_type, options)?),
        "boolean" => Selector::Boolean(parse_options(selector_type, options)?),
        "time" => Selector::Time(parse_options(selector_type, options)?),
        "target" => Selector::Target(parse_options(selector_type, options)?),
        "action" => Selector::Action(parse_options(selector_type, options)?),
        "object" => Selector::Object(parse_options(selector_type, options)?),
        "text" => Selector::Text(parse_options(selector_type, options)?),
        "select" => {
            let select: SelectSelectorConfig = parse_options(selector_type, options)?;
            select
                .check()
                .map_err(|reason| SelectorError::invalid(selector_type, reason))?;
            Selector::Select(select)
        }
        other => return Err(SelectorError::UnknownType(other.to_string())),
    };

    Ok(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_body_is_empty_config() {
        let selector = validate_selector(&json!({"device": null})).unwrap();
        assert_eq!(selector, Selector::Unconfigured("device"));
        assert_eq!(selector.selector_type(), "device");
        assert_eq!(selector.to_value(), json!({"device": {}}));
    }

    #[test]
    fn test_null_body_skips_option_checks() {
        for selector_type in ["number", "select", "text"] {
            let selector = validate_selector(&json!({ selector_type: null })).unwrap();
            assert_eq!(selector.selector_type(), selector_type);
            assert_eq!(selector.to_value(), json!({ selector_type: {} }));
        }
    }

    #[test]
    fn test_base_schema_errors() {
        assert_eq!(
            validate_selector(&json!("entity")).unwrap_err(),
            SelectorError::NotAMapping
        );
        assert_eq!(
            validate_selector(&json!({})).unwrap_err(),
            SelectorError::MissingType
        );
        assert_eq!(
            validate_selector(&json!({"non_existing": {}})).unwrap_err(),
            SelectorError::UnknownType("non_existing".to_string())
        );
        assert!(matches!(
            validate_selector(&json!({"device": {}, "entity": {}})).unwrap_err(),
            SelectorError::MultipleTypes(types) if types.len() == 2
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SelectorError::MultipleTypes(vec!["device".into(), "entity".into()]).to_string(),
            "Only one type can be specified. Found device, entity"
        );
        assert_eq!(
            SelectorError::UnknownType("color".into()).to_string(),
            "Unknown selector type color found"
        );
    }

    #[test]
    fn test_defaults_are_filled() {
        let number = validate_selector(&json!({"number": {"min": 0, "max": 10}})).unwrap();
        assert_eq!(
            number.to_value(),
            json!({"number": {"min": 0.0, "max": 10.0, "step": 1.0, "mode": "slider"}})
        );

        let text = validate_selector(&json!({"text": {}})).unwrap();
        assert_eq!(text.to_value(), json!({"text": {"multiline": false}}));
    }

    #[test]
    fn test_number_min_greater_than_max() {
        let err = validate_selector(&json!({"number": {"min": 100, "max": 1}})).unwrap_err();
        assert!(matches!(
            err,
            SelectorError::InvalidConfig { ref selector_type, .. } if selector_type == "number"
        ));
    }

    #[test]
    fn test_number_requires_bounds() {
        assert!(validate_selector(&json!({"number": {}})).is_err());
        assert!(validate_selector(&json!({"number": {"min": 1}})).is_err());
    }

    #[test]
    fn test_deserialize_through_validation() {
        let selector: Selector =
            serde_json::from_value(json!({"select": {"options": ["red", "green"]}})).unwrap();
        assert_eq!(selector.selector_type(), "select");

        let result: Result<Selector, _> = serde_json::from_value(json!({"select": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_every_registered_type_is_constructible() {
        for selector_type in SELECTOR_TYPES {
            let config = match *selector_type {
                "number" => json!({"number": {"min": 0, "max": 1}}),
                "select" => json!({"select": {"options": ["a"]}}),
                other => json!({ other: null }),
            };
            let selector = validate_selector(&config).unwrap();
            assert_eq!(selector.selector_type(), *selector_type);
        }
    }
}
