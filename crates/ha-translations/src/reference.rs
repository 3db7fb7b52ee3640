//! Key references like `[%key:common::config_flow::abort::no_devices_found%]`
//!
//! A reference points at another string by its `::`-separated key path,
//! rooted at the core strings (`common::...`) or at an integration's strings
//! (`component::<domain>::...`).

use crate::error::{TranslationError, TranslationResult};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

const OPEN: &str = "[%key:";
const CLOSE: &str = "%]";

/// Two or more `::`-separated segments
fn key_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+(?:::[A-Za-z0-9_-]+)+$").expect("valid regex")
    })
}

/// Every `[%key:...%]` token in a string with its byte range
///
/// An unterminated token runs to the end of the string and fails to parse.
fn tokens(value: &str) -> Vec<(Range<usize>, TranslationResult<KeyReference>)> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(offset) = value[pos..].find(OPEN) {
        let start = pos + offset;
        let Some(len) = value[start..].find(CLOSE) else {
            let token = &value[start..];
            found.push((
                start..value.len(),
                Err(TranslationError::InvalidReference(token.to_string())),
            ));
            break;
        };
        let end = start + len + CLOSE.len();
        found.push((start..end, KeyReference::parse(&value[start..end])));
        pos = end;
    }
    found
}

/// A parsed key reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyReference {
    parts: Vec<String>,
}

impl KeyReference {
    /// Parse a string that is exactly one reference
    pub fn parse(reference: &str) -> TranslationResult<Self> {
        let invalid = || TranslationError::InvalidReference(reference.to_string());
        let inner = reference
            .strip_prefix(OPEN)
            .and_then(|s| s.strip_suffix(CLOSE))
            .ok_or_else(invalid)?;
        if !key_path_regex().is_match(inner) {
            return Err(invalid());
        }

        Ok(Self {
            parts: inner.split("::").map(String::from).collect(),
        })
    }

    /// All well-formed references contained in a string, in order of appearance
    pub fn find_all(value: &str) -> Vec<Self> {
        tokens(value)
            .into_iter()
            .filter_map(|(_, reference)| reference.ok())
            .collect()
    }

    /// Whether a string contains something that looks like a reference
    pub fn looks_like_reference(value: &str) -> bool {
        value.contains(OPEN)
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Navigate the reference's key path in `root`
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for part in &self.parts {
            current = current.get(part)?;
        }
        Some(current)
    }
}

impl fmt::Display for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[%key:{}%]", self.parts.join("::"))
    }
}

/// The namespace references are resolved in
///
/// Structure: `{"common": ..., <other core keys>, "component": {domain: strings}}`
#[derive(Debug, Clone)]
pub struct ReferenceContext {
    root: Value,
}

impl ReferenceContext {
    /// Create a context from the core `strings.json`
    pub fn new(core_strings: Value) -> Self {
        let root = match core_strings {
            Value::Object(map) => Value::Object(map),
            _ => Value::Object(serde_json::Map::new()),
        };
        Self { root }
    }

    /// Make an integration's strings reachable as `component::<domain>::...`
    pub fn add_component(&mut self, domain: &str, strings: Value) {
        let Value::Object(root) = &mut self.root else {
            return;
        };
        let components = root
            .entry("component")
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(components) = components {
            components.insert(domain.to_string(), strings);
        }
    }

    pub fn with_component(mut self, domain: &str, strings: Value) -> Self {
        self.add_component(domain, strings);
        self
    }

    /// Resolve one reference to its final string
    pub fn resolve_reference(&self, reference: &KeyReference) -> TranslationResult<String> {
        let mut seen = HashSet::new();
        self.resolve_inner(reference, &mut seen)
    }

    /// Replace every reference in a string with the referenced text
    pub fn resolve_string(&self, value: &str) -> TranslationResult<String> {
        let mut seen = HashSet::new();
        self.resolve_string_inner(value, &mut seen)
    }

    /// Resolve a string, leaving it unchanged if any reference is broken
    pub fn resolve_string_lossy(&self, value: &str) -> String {
        self.resolve_string(value)
            .unwrap_or_else(|_| value.to_string())
    }

    fn resolve_inner(
        &self,
        reference: &KeyReference,
        seen: &mut HashSet<KeyReference>,
    ) -> TranslationResult<String> {
        if !seen.insert(reference.clone()) {
            return Err(TranslationError::CircularReference(reference.to_string()));
        }

        let target = reference
            .lookup(&self.root)
            .ok_or_else(|| TranslationError::UnresolvedReference(reference.to_string()))?;
        let text = target
            .as_str()
            .ok_or_else(|| TranslationError::NotAString(reference.to_string()))?;

        let resolved = self.resolve_string_inner(text, seen)?;
        seen.remove(reference);
        Ok(resolved)
    }

    fn resolve_string_inner(
        &self,
        value: &str,
        seen: &mut HashSet<KeyReference>,
    ) -> TranslationResult<String> {
        if !KeyReference::looks_like_reference(value) {
            return Ok(value.to_string());
        }

        let mut result = String::with_capacity(value.len());
        let mut last = 0;
        for (range, reference) in tokens(value) {
            let reference = reference?;
            result.push_str(&value[last..range.start]);
            result.push_str(&self.resolve_inner(&reference, seen)?);
            last = range.end;
        }
        result.push_str(&value[last..]);

        Ok(result)
    }
}

/// Every `(key path, reference)` pair in a strings document
///
/// Key paths are `::`-separated, matching the reference syntax.
pub fn find_references(strings: &Value) -> Vec<(String, KeyReference)> {
    let mut found = Vec::new();
    collect_references(strings, "", &mut found);
    found
}

fn collect_references(value: &Value, path: &str, found: &mut Vec<(String, KeyReference)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}::{}", path, key)
                };
                collect_references(child, &child_path, found);
            }
        }
        Value::String(s) => {
            for reference in KeyReference::find_all(s) {
                found.push((path.to_string(), reference));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn common() -> Value {
        json!({
            "common": {
                "config_flow": {
                    "abort": {
                        "no_devices_found": "No devices found on the network",
                        "already_configured_device": "Device is already configured"
                    },
                    "data": {
                        "host": "Host"
                    }
                },
                "state": {"on": "On"}
            }
        })
    }

    #[test]
    fn test_parse_reference() {
        let reference =
            KeyReference::parse("[%key:common::config_flow::abort::no_devices_found%]").unwrap();
        assert_eq!(
            reference.parts(),
            &["common", "config_flow", "abort", "no_devices_found"]
        );
        assert_eq!(
            reference.to_string(),
            "[%key:common::config_flow::abort::no_devices_found%]"
        );
    }

    #[test]
    fn test_parse_invalid_reference() {
        assert!(KeyReference::parse("common::config_flow").is_err());
        assert!(KeyReference::parse("[%key:common%]").is_err());
        assert!(KeyReference::parse("[%key:common::::x%]").is_err());
        assert!(KeyReference::parse("[%key:common::config flow::x%]").is_err());
    }

    #[test]
    fn test_malformed_reference_is_an_error() {
        let context = ReferenceContext::new(common());
        for value in [
            "[%key:common%]",
            "[%key:common::config flow::x%]",
            "Use [%key:common::state::on",
            "[%key:common::state::on%] or [%key:%]",
        ] {
            assert!(
                matches!(
                    context.resolve_string(value),
                    Err(TranslationError::InvalidReference(_))
                ),
                "{} should be rejected",
                value
            );
            assert_eq!(context.resolve_string_lossy(value), value);
        }
        assert_eq!(
            KeyReference::find_all("[%key:common%] [%key:common::state::on%]").len(),
            1
        );
    }

    #[test]
    fn test_resolve_key_reference() {
        let context = ReferenceContext::new(common());
        let reference =
            KeyReference::parse("[%key:common::config_flow::abort::no_devices_found%]").unwrap();
        assert_eq!(
            context.resolve_reference(&reference).unwrap(),
            "No devices found on the network"
        );
    }

    #[test]
    fn test_resolve_string_value() {
        let context = ReferenceContext::new(common());

        // Key reference
        let result = context
            .resolve_string("[%key:common::config_flow::abort::no_devices_found%]")
            .unwrap();
        assert_eq!(result, "No devices found on the network");

        // Plain string
        let result = context.resolve_string("Hello world").unwrap();
        assert_eq!(result, "Hello world");

        // Embedded reference
        let result = context
            .resolve_string("IP or [%key:common::config_flow::data::host%] name")
            .unwrap();
        assert_eq!(result, "IP or Host name");
    }

    #[test]
    fn test_unresolved_reference() {
        let context = ReferenceContext::new(common());
        assert!(matches!(
            context.resolve_string("[%key:common::config_flow::abort::missing%]"),
            Err(TranslationError::UnresolvedReference(_))
        ));
        assert!(matches!(
            context.resolve_string("[%key:common::config_flow::abort%]"),
            Err(TranslationError::NotAString(_))
        ));
        assert_eq!(
            context.resolve_string_lossy("[%key:common::nope::nothing%]"),
            "[%key:common::nope::nothing%]"
        );
    }

    #[test]
    fn test_component_references_and_chains() {
        let context = ReferenceContext::new(common()).with_component(
            "hue",
            json!({
                "config": {
                    "abort": {
                        "no_bridges": "[%key:common::config_flow::abort::no_devices_found%]"
                    }
                }
            }),
        );

        let result = context
            .resolve_string("[%key:component::hue::config::abort::no_bridges%]")
            .unwrap();
        assert_eq!(result, "No devices found on the network");
    }

    #[test]
    fn test_circular_reference() {
        let context = ReferenceContext::new(json!({})).with_component(
            "demo",
            json!({
                "a": "[%key:component::demo::b%]",
                "b": "[%key:component::demo::a%]"
            }),
        );
        assert!(matches!(
            context.resolve_string("[%key:component::demo::a%]"),
            Err(TranslationError::CircularReference(_))
        ));
    }

    #[test]
    fn test_same_reference_twice_is_not_circular() {
        let context = ReferenceContext::new(common());
        let result = context
            .resolve_string("[%key:common::state::on%]/[%key:common::state::on%]")
            .unwrap();
        assert_eq!(result, "On/On");
    }

    #[test]
    fn test_find_references() {
        let strings = json!({
            "config": {
                "step": {"user": {"title": "Pick a device"}},
                "abort": {
                    "already_configured": "[%key:common::config_flow::abort::already_configured_device%]"
                }
            }
        });
        let found = find_references(&strings);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "config::abort::already_configured");
        assert_eq!(
            found[0].1.parts().last().map(String::as_str),
            Some("already_configured_device")
        );
    }
}
