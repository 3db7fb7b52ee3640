//! Run results and their text / JSON rendering

use ha_core::{Integration, ValidationIssue};
use serde::Serialize;
use std::fmt::Write;

/// Outcome of a checker run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Problems not tied to an integration
    pub errors: Vec<ValidationIssue>,
    pub integrations: Vec<Integration>,
    /// Number of services described by the checked integrations
    pub service_count: usize,
}

impl Report {
    pub fn invalid_integrations(&self) -> impl Iterator<Item = &Integration> {
        self.integrations.iter().filter(|i| i.has_errors())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.invalid_integrations().next().is_some()
    }

    /// Whether every error can be fixed by the generate action
    pub fn only_fixable_errors(&self) -> bool {
        self.has_errors()
            && self
                .errors
                .iter()
                .chain(self.integrations.iter().flat_map(|i| i.errors.iter()))
                .all(|e| e.fixable)
    }

    /// Human-readable report
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Integrations: {}", self.integrations.len());
        let _ = writeln!(out, "Invalid integrations: {}", self.invalid_integrations().count());
        let _ = writeln!(out, "Services: {}", self.service_count);

        if !self.errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Fatal errors:");
            for error in &self.errors {
                let _ = writeln!(out, "* {}", error);
            }
        }

        for integration in &self.integrations {
            if integration.errors.is_empty() && integration.warnings.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "Integration {}:", integration.domain);
            for error in &integration.errors {
                let _ = writeln!(out, "* [ERROR] {}", error);
            }
            for warning in &integration.warnings {
                let _ = writeln!(out, "* [WARNING] {}", warning);
            }
        }

        if self.only_fixable_errors() {
            let _ = writeln!(out);
            let _ = writeln!(out, "All errors can be fixed by running with --action generate");
        }

        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "integrations": self.integrations.len(),
            "invalid_integrations": self.invalid_integrations().count(),
            "services": self.service_count,
            "errors": self.errors,
            "issues": self
                .integrations
                .iter()
                .filter(|i| !i.errors.is_empty() || !i.warnings.is_empty())
                .collect::<Vec<_>>(),
        })
    }
}
