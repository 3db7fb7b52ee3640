//! Issue-report form templates
//!
//! Parses the `.github/ISSUE_TEMPLATE/*.yml` forms and checks them for the
//! mistakes GitHub would otherwise only report when the form is rendered.

pub mod error;
pub mod form;

pub use error::{IssueFormError, IssueFormResult};
pub use form::{
    BodyElement, CheckboxOption, CheckboxesAttributes, DropdownAttributes, ElementKind,
    InputAttributes, IssueForm, MarkdownAttributes, TextareaAttributes, Validations,
};

use std::path::Path;
use tracing::debug;

/// Parse an issue form from YAML text
pub fn parse_issue_form(content: &str, source_name: &str) -> IssueFormResult<IssueForm> {
    let json = ha_config::parse_yaml_document(content, source_name)?;
    Ok(serde_json::from_value(json)?)
}

/// Load an issue form file
pub fn load_issue_form(path: &Path) -> IssueFormResult<IssueForm> {
    debug!("Loading issue form {:?}", path);
    let json = ha_config::load_yaml_document(path)?;
    Ok(serde_json::from_value(json)?)
}

/// Whether a file is an issue form (`.yml` or `.yaml`)
///
/// `config.yml` configures the template chooser and is not a form.
pub fn is_issue_form_file(path: &Path) -> bool {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    );
    let is_chooser_config = path.file_stem().and_then(|s| s.to_str()) == Some("config");
    is_yaml && !is_chooser_config
}
