//! Integration and run configuration records

use crate::issue::ValidationIssue;
use crate::manifest::Manifest;
use crate::slug::is_valid_domain;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a checker run should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Only report problems
    #[default]
    Validate,
    /// Report problems and regenerate derived files
    Generate,
}

/// An integration directory under `homeassistant/components`
#[derive(Debug, Clone, Serialize)]
pub struct Integration {
    /// Domain, taken from the directory name
    pub domain: String,
    /// Path of the integration directory
    #[serde(skip)]
    pub path: PathBuf,
    /// Parsed `manifest.json`, when present and readable
    #[serde(skip)]
    pub manifest: Option<Manifest>,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Integration {
    /// Create an integration record for a directory
    ///
    /// Returns `None` when the path has no usable file name.
    pub fn load(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let domain = path.file_name()?.to_str()?.to_string();
        let mut integration = Self {
            domain,
            path,
            manifest: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        if !is_valid_domain(&integration.domain) {
            let message = format!("Domain '{}' is not a valid slug", integration.domain);
            integration.add_error("core", message);
        }

        Some(integration)
    }

    /// Path of a file inside the integration directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Whether the manifest declares a config flow
    pub fn config_flow(&self) -> bool {
        self.manifest.as_ref().is_some_and(|m| m.config_flow)
    }

    pub fn add_error(&mut self, plugin: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(plugin, message));
    }

    pub fn add_fixable_error(&mut self, plugin: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(plugin, message).fixable());
    }

    pub fn add_warning(&mut self, plugin: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(plugin, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Configuration of a checker run
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root (contains `homeassistant/` and `.github/`)
    pub root: PathBuf,
    /// Only check these integration directories when non-empty
    pub specific_integrations: Vec<PathBuf>,
    pub action: Action,
    /// Plugin names to run; empty means all
    pub plugins: Vec<String>,
    /// Problems not tied to a single integration
    pub errors: Vec<ValidationIssue>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            specific_integrations: Vec::new(),
            action: Action::Validate,
            plugins: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn components_dir(&self) -> PathBuf {
        self.root.join("homeassistant").join("components")
    }

    /// Path of the shared `strings.json` that `common::` references point into
    pub fn core_strings_path(&self) -> PathBuf {
        self.root.join("homeassistant").join("strings.json")
    }

    pub fn issue_template_dir(&self) -> PathBuf {
        self.root.join(".github").join("ISSUE_TEMPLATE")
    }

    /// Whether a plugin was selected for this run
    pub fn plugin_enabled(&self, name: &str) -> bool {
        self.plugins.is_empty() || self.plugins.iter().any(|p| p == name)
    }

    pub fn add_error(&mut self, plugin: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(plugin, message));
    }

    /// Make a path relative to the root for display
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
