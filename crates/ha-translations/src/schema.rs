//! Structural checks for `strings.json`

use crate::reference::ReferenceContext;
use crate::table::StringTable;
use ha_core::is_valid_slug;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

const TOP_LEVEL_KEYS: &[&str] = &[
    "title",
    "config",
    "options",
    "device_automation",
    "state",
    "system_health",
];

const DATA_ENTRY_KEYS: &[&str] = &["flow_title", "step", "error", "abort", "create_entry"];
const STEP_KEYS: &[&str] = &["title", "description", "data"];
const DEVICE_AUTOMATION_KEYS: &[&str] =
    &["action_type", "condition_type", "trigger_type", "trigger_subtype"];

/// Translations must be plain text
fn html_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<[a-z].*?>").expect("valid regex"))
}

/// A problem found in a strings document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringsProblem {
    /// Dotted key path, empty for the document itself
    pub path: String,
    pub message: String,
}

impl fmt::Display for StringsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

struct Checker<'a> {
    context: &'a ReferenceContext,
    problems: Vec<StringsProblem>,
}

impl Checker<'_> {
    fn report(&mut self, path: &str, message: impl Into<String>) {
        self.problems.push(StringsProblem {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => {
                self.report(path, "expected a dictionary");
                None
            }
        }
    }

    fn unknown_keys(&mut self, map: &Map<String, Value>, allowed: &[&str], path: &str) {
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.report(&join(path, key), "extra keys not allowed");
            }
        }
    }

    fn string(&mut self, value: &Value, path: &str) {
        let Some(text) = value.as_str() else {
            self.report(path, "expected str");
            return;
        };
        if html_regex().is_match(text) {
            self.report(path, "the string should not contain HTML");
        }
        if let Err(e) = self.context.resolve_string(text) {
            self.report(path, e.to_string());
        }
    }

    fn string_map(&mut self, value: &Value, path: &str) {
        if let Some(map) = self.object(value, path) {
            for (key, val) in map {
                self.string(val, &join(path, key));
            }
        }
    }

    fn data_entry(&mut self, value: &Value, path: &str) {
        let Some(map) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(map, DATA_ENTRY_KEYS, path);

        if path == "config" && map.contains_key("title") {
            self.report(
                "config.title",
                "Invalid title: the title key has moved out of config to the root of strings.json",
            );
        }

        if let Some(flow_title) = map.get("flow_title") {
            self.string(flow_title, &join(path, "flow_title"));
        }

        let step_path = join(path, "step");
        match map.get("step") {
            Some(steps) => {
                if let Some(steps) = self.object(steps, &step_path) {
                    for (step_id, step) in steps {
                        self.step(step, &join(&step_path, step_id));
                    }
                }
            }
            None => self.report(&step_path, "required key not provided"),
        }

        for section in ["error", "abort", "create_entry"] {
            if let Some(value) = map.get(section) {
                self.string_map(value, &join(path, section));
            }
        }
    }

    fn step(&mut self, value: &Value, path: &str) {
        let Some(map) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(map, STEP_KEYS, path);
        for key in ["title", "description"] {
            if let Some(value) = map.get(key) {
                self.string(value, &join(path, key));
            }
        }
        if let Some(data) = map.get("data") {
            self.string_map(data, &join(path, "data"));
        }
    }

    fn device_automation(&mut self, value: &Value) {
        let path = "device_automation";
        let Some(map) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(map, DEVICE_AUTOMATION_KEYS, path);
        for key in DEVICE_AUTOMATION_KEYS {
            if let Some(value) = map.get(*key) {
                self.string_map(value, &join(path, key));
            }
        }
    }

    fn state(&mut self, value: &Value) {
        let path = "state";
        let Some(classes) = self.object(value, path) else {
            return;
        };
        for (device_class, states) in classes {
            let class_path = join(path, device_class);
            if device_class != "_" && !is_valid_slug(device_class) {
                self.report(&class_path, "invalid device class");
            }
            let Some(states) = self.object(states, &class_path) else {
                continue;
            };
            for (state, text) in states {
                let state_path = join(&class_path, state);
                if state.to_lowercase() != *state {
                    self.report(&state_path, "state keys must be lowercase");
                }
                self.string(text, &state_path);
            }
        }
    }

    fn system_health(&mut self, value: &Value) {
        let path = "system_health";
        let Some(map) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(map, &["info"], path);
        if let Some(info) = map.get("info") {
            self.string_map(info, "system_health.info");
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Check a strings table against the `strings.json` schema
///
/// `config_flow` is whether the integration has a config flow, in which case
/// the `config` section is required. References are resolved in `context`,
/// which should already contain the table itself.
pub fn validate_strings(
    table: &StringTable,
    context: &ReferenceContext,
    config_flow: bool,
) -> Vec<StringsProblem> {
    let mut checker = Checker {
        context,
        problems: Vec::new(),
    };

    let Some(root) = checker.object(table.strings(), "") else {
        return checker.problems;
    };

    for (key, value) in root {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            checker.report(key, "extra keys not allowed");
            continue;
        }
        match key.as_str() {
            "title" => checker.string(value, "title"),
            "config" | "options" => checker.data_entry(value, key),
            "device_automation" => checker.device_automation(value),
            "state" => checker.state(value),
            "system_health" => checker.system_health(value),
            _ => {}
        }
    }

    if config_flow && !root.contains_key("config") {
        checker.report(
            "config",
            format!(
                "{} has a config flow but strings.json has no config section",
                table.domain()
            ),
        );
    }

    checker.problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(strings: Value, config_flow: bool) -> Vec<String> {
        let table = StringTable::new("demo", strings.clone());
        let context = ReferenceContext::new(json!({
            "common": {"config_flow": {"data": {"host": "Host"}}}
        }))
        .with_component("demo", strings);
        validate_strings(&table, &context, config_flow)
            .into_iter()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn test_valid_strings() {
        let problems = check(
            json!({
                "title": "Demo",
                "config": {
                    "flow_title": "{name}",
                    "step": {
                        "user": {
                            "title": "Connect",
                            "description": "Set up your device.",
                            "data": {"host": "[%key:common::config_flow::data::host%]"}
                        }
                    },
                    "error": {"cannot_connect": "Failed to connect"},
                    "abort": {"already_configured": "Device is already configured"}
                },
                "options": {"step": {"init": {"data": {"scan_interval": "Scan interval"}}}},
                "device_automation": {
                    "trigger_type": {"turned_on": "{entity_name} turned on"}
                },
                "state": {
                    "_": {"on": "On", "off": "Off"},
                    "battery": {"low": "Low"}
                },
                "system_health": {"info": {"can_reach_server": "Reach server"}}
            }),
            true,
        );
        assert!(problems.is_empty(), "{:?}", problems);
    }

    #[test]
    fn test_config_title_moved() {
        let problems = check(json!({"config": {"title": "Demo", "step": {}}}), false);
        assert!(problems.iter().any(|p| p.contains("moved out of config")));
    }

    #[test]
    fn test_step_required() {
        let problems = check(json!({"options": {"error": {}}}), false);
        assert_eq!(problems, vec!["options.step: required key not provided"]);
    }

    #[test]
    fn test_unknown_top_level_key() {
        let problems = check(json!({"services": {}}), false);
        assert_eq!(problems, vec!["services: extra keys not allowed"]);
    }

    #[test]
    fn test_html_rejected() {
        let problems = check(
            json!({"config": {"step": {"user": {"description": "See <a href=\"x\">docs</a>"}}}}),
            false,
        );
        assert_eq!(
            problems,
            vec!["config.step.user.description: the string should not contain HTML"]
        );

        // A lone angle bracket is not a tag
        assert!(check(json!({"title": "a < b"}), false).is_empty());
    }

    #[test]
    fn test_unresolved_reference() {
        let problems = check(
            json!({"config": {"step": {}, "abort": {"x": "[%key:common::config_flow::abort::x%]"}}}),
            false,
        );
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("config.abort.x: invalid reference"));
    }

    #[test]
    fn test_malformed_reference_reported() {
        let problems = check(
            json!({"config": {"step": {}, "abort": {
                "a": "[%key:common%]",
                "b": "[%key:common::config flow::x%]"
            }}}),
            false,
        );
        assert_eq!(
            problems,
            vec![
                "config.abort.a: invalid key reference '[%key:common%]'",
                "config.abort.b: invalid key reference '[%key:common::config flow::x%]'",
            ]
        );
    }

    #[test]
    fn test_state_keys_lowercase() {
        let problems = check(json!({"state": {"_": {"On": "On"}}}), false);
        assert_eq!(problems, vec!["state._.On: state keys must be lowercase"]);
    }

    #[test]
    fn test_config_flow_requires_config() {
        let problems = check(json!({"title": "Demo"}), true);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("no config section"));
    }

    #[test]
    fn test_non_string_value() {
        let problems = check(json!({"title": 5}), false);
        assert_eq!(problems, vec!["title: expected str"]);
    }
}
