//! Issue-report form checks

use super::Plugin;
use ha_core::{Config, Integration};
use ha_issue_form::{is_issue_form_file, load_issue_form};
use tracing::debug;

const PLUGIN: &str = "issue_form";

/// Checks every form in `.github/ISSUE_TEMPLATE`
pub struct IssueFormPlugin;

impl Plugin for IssueFormPlugin {
    fn name(&self) -> &'static str {
        PLUGIN
    }

    fn core_only(&self) -> bool {
        true
    }

    fn validate(&self, _integrations: &mut [Integration], config: &mut Config) {
        let dir = config.issue_template_dir();
        let Ok(entries) = std::fs::read_dir(&dir) else {
            debug!("No issue templates at {:?}", dir);
            return;
        };

        let mut forms: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_issue_form_file(path))
            .collect();
        forms.sort();

        for path in forms {
            let shown = config.display_path(&path).display().to_string();
            match load_issue_form(&path) {
                Ok(form) => {
                    for problem in form.validate() {
                        config.add_error(PLUGIN, format!("{}: {}", shown, problem));
                    }
                }
                Err(e) => config.add_error(PLUGIN, format!("{}: {}", shown, e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reports_form_problems_at_core_level() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join(".github/ISSUE_TEMPLATE");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("task.yml"),
            "name: Task\ndescription: ''\nbody:\n  - type: input\n    attributes:\n      label: Version\n",
        )
        .unwrap();
        fs::write(templates.join("config.yml"), "blank_issues_enabled: false\n").unwrap();

        let mut config = Config::new(dir.path());
        IssueFormPlugin.validate(&mut [], &mut config);
        assert_eq!(config.errors.len(), 1);
        assert_eq!(
            config.errors[0].to_string(),
            "[ISSUE_FORM] .github/ISSUE_TEMPLATE/task.yml: description must not be empty"
        );
    }

    #[test]
    fn test_missing_template_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new(dir.path());
        IssueFormPlugin.validate(&mut [], &mut config);
        assert!(config.errors.is_empty());
    }
}
