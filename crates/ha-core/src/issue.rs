//! Validation findings

use serde::{Deserialize, Serialize};
use std::fmt;

/// A problem found by one of the checker plugins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Plugin that reported the issue (e.g., "services")
    pub plugin: String,
    /// Human-readable message
    pub message: String,
    /// Whether running the generate action fixes it
    #[serde(default)]
    pub fixable: bool,
}

impl ValidationIssue {
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
            fixable: false,
        }
    }

    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.plugin.to_uppercase(), self.message)
    }
}
