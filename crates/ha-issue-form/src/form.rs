//! Issue form model
//!
//! Mirrors the GitHub issue-form syntax: top-level metadata plus a `body`
//! list of input elements tagged by `type`.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Deserialize a field that can be either a single string or an array of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<String>),
    }

    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        StringOrVec::Vec(v) => Ok(v),
    }
}

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"))
}

/// An issue-report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueForm {
    pub name: String,
    pub description: String,
    /// Default issue title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_vec")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "string_or_vec")]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub body: Vec<BodyElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Validations {
    #[serde(default)]
    pub required: bool,
}

/// One element of the form body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default)]
    pub validations: Validations,
}

/// Element type with its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "attributes", rename_all = "lowercase")]
pub enum ElementKind {
    Markdown(MarkdownAttributes),
    Textarea(TextareaAttributes),
    Input(InputAttributes),
    Dropdown(DropdownAttributes),
    Checkboxes(CheckboxesAttributes),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkdownAttributes {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextareaAttributes {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Syntax highlighting language for the entered text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputAttributes {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropdownAttributes {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckboxesAttributes {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<CheckboxOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckboxOption {
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Markdown(_) => "markdown",
            ElementKind::Textarea(_) => "textarea",
            ElementKind::Input(_) => "input",
            ElementKind::Dropdown(_) => "dropdown",
            ElementKind::Checkboxes(_) => "checkboxes",
        }
    }

    /// Label of an input element, `None` for markdown
    pub fn label(&self) -> Option<&str> {
        match self {
            ElementKind::Markdown(_) => None,
            ElementKind::Textarea(a) => Some(&a.label),
            ElementKind::Input(a) => Some(&a.label),
            ElementKind::Dropdown(a) => Some(&a.label),
            ElementKind::Checkboxes(a) => Some(&a.label),
        }
    }
}

impl BodyElement {
    /// How the element is named in problem messages
    fn describe(&self, index: usize) -> String {
        match &self.id {
            Some(id) => format!("body[{}] ({} '{}')", index, self.kind.type_name(), id),
            None => format!("body[{}] ({})", index, self.kind.type_name()),
        }
    }
}

impl IssueForm {
    /// Structural problems of the form, empty when it is valid
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            problems.push("description must not be empty".to_string());
        }
        if self.body.is_empty() {
            problems.push("body must contain at least one element".to_string());
        }

        let mut ids = HashSet::new();
        for (index, element) in self.body.iter().enumerate() {
            let at = element.describe(index);

            if let Some(id) = &element.id {
                if !id_regex().is_match(id) {
                    problems.push(format!(
                        "{}: id may only contain letters, digits, '-' and '_'",
                        at
                    ));
                }
                if !ids.insert(id.as_str()) {
                    problems.push(format!("{}: duplicate id '{}'", at, id));
                }
            }

            match &element.kind {
                ElementKind::Markdown(markdown) => {
                    if markdown.value.trim().is_empty() {
                        problems.push(format!("{}: markdown requires a value", at));
                    }
                    if element.validations.required {
                        problems.push(format!("{}: markdown cannot be required", at));
                    }
                }
                kind => {
                    if kind.label().is_some_and(|l| l.trim().is_empty()) {
                        problems.push(format!("{}: label must not be empty", at));
                    }
                }
            }

            match &element.kind {
                ElementKind::Dropdown(dropdown) => {
                    check_options(&at, dropdown.options.iter().map(String::as_str), &mut problems);
                }
                ElementKind::Checkboxes(checkboxes) => {
                    let labels = checkboxes.options.iter().map(|o| o.label.as_str());
                    check_options(&at, labels, &mut problems);
                }
                _ => {}
            }
        }

        problems
    }

    /// Ids of the elements that must be filled in
    pub fn required_ids(&self) -> Vec<&str> {
        self.body
            .iter()
            .filter(|e| e.validations.required)
            .filter_map(|e| e.id.as_deref())
            .collect()
    }
}

fn check_options<'a>(
    at: &str,
    options: impl Iterator<Item = &'a str>,
    problems: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    let mut count = 0;
    for option in options {
        count += 1;
        if option.trim().is_empty() {
            problems.push(format!("{}: options must not be empty strings", at));
        } else if !seen.insert(option) {
            problems.push(format!("{}: duplicate option '{}'", at, option));
        }
    }
    if count == 0 {
        problems.push(format!("{}: at least one option is required", at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(body: serde_json::Value) -> IssueForm {
        serde_json::from_value(json!({
            "name": "Report an issue",
            "description": "Report an issue with Home Assistant.",
            "body": body
        }))
        .unwrap()
    }

    #[test]
    fn test_labels_string_or_list() {
        let parsed: IssueForm = serde_json::from_value(json!({
            "name": "Feature",
            "description": "Suggest an idea",
            "labels": "enhancement, triage",
            "body": []
        }))
        .unwrap();
        assert_eq!(parsed.labels, vec!["enhancement", "triage"]);

        let parsed: IssueForm = serde_json::from_value(json!({
            "name": "Feature",
            "description": "Suggest an idea",
            "labels": ["enhancement"],
            "body": []
        }))
        .unwrap();
        assert_eq!(parsed.labels, vec!["enhancement"]);
    }

    #[test]
    fn test_element_parsing() {
        let form = form(json!([
            {"type": "markdown", "attributes": {"value": "Thanks for reporting!"}},
            {
                "type": "textarea",
                "id": "problem",
                "validations": {"required": true},
                "attributes": {"label": "The problem", "render": "txt"}
            },
            {
                "type": "dropdown",
                "id": "installation",
                "attributes": {"label": "Installation method", "options": ["OS", "Container"]}
            }
        ]));
        assert!(form.validate().is_empty(), "{:?}", form.validate());
        assert_eq!(form.required_ids(), vec!["problem"]);
        let ElementKind::Textarea(textarea) = &form.body[1].kind else {
            panic!("Expected textarea");
        };
        assert_eq!(textarea.render.as_deref(), Some("txt"));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<IssueForm, _> = serde_json::from_value(json!({
            "name": "x",
            "description": "y",
            "body": [{"type": "slider", "attributes": {"label": "Level"}}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_metadata() {
        let mut form = form(json!([]));
        form.name = " ".to_string();
        let problems = form.validate();
        assert!(problems.contains(&"name must not be empty".to_string()));
        assert!(problems.contains(&"body must contain at least one element".to_string()));
    }

    #[test]
    fn test_required_field_needs_label() {
        let form = form(json!([
            {"type": "input", "id": "version", "validations": {"required": true}, "attributes": {}}
        ]));
        assert_eq!(
            form.validate(),
            vec!["body[0] (input 'version'): label must not be empty"]
        );
    }

    #[test]
    fn test_markdown_rules() {
        let form = form(json!([
            {"type": "markdown", "validations": {"required": true}, "attributes": {"value": ""}}
        ]));
        assert_eq!(
            form.validate(),
            vec![
                "body[0] (markdown): markdown requires a value",
                "body[0] (markdown): markdown cannot be required",
            ]
        );
    }

    #[test]
    fn test_options_and_ids() {
        let form = form(json!([
            {"type": "dropdown", "id": "method", "attributes": {"label": "Method", "options": []}},
            {
                "type": "checkboxes",
                "id": "method",
                "attributes": {
                    "label": "Checks",
                    "options": [{"label": "Searched"}, {"label": "Searched", "required": true}]
                }
            },
            {"type": "input", "id": "bad id", "attributes": {"label": "Version"}}
        ]));
        assert_eq!(
            form.validate(),
            vec![
                "body[0] (dropdown 'method'): at least one option is required",
                "body[1] (checkboxes 'method'): duplicate id 'method'",
                "body[1] (checkboxes 'method'): duplicate option 'Searched'",
                "body[2] (input 'bad id'): id may only contain letters, digits, '-' and '_'",
            ]
        );
    }
}
