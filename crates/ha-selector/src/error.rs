//! Selector validation errors

use thiserror::Error;

/// Result type for selector validation
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Why a selector configuration was rejected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectorError {
    #[error("Expected a dictionary")]
    NotAMapping,

    #[error("No selector type specified")]
    MissingType,

    #[error("Only one type can be specified. Found {}", .0.join(", "))]
    MultipleTypes(Vec<String>),

    #[error("Unknown selector type {0} found")]
    UnknownType(String),

    #[error("invalid {selector_type} selector: {reason}")]
    InvalidConfig {
        selector_type: String,
        reason: String,
    },
}

impl SelectorError {
    pub(crate) fn invalid(selector_type: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            selector_type: selector_type.to_string(),
            reason: reason.into(),
        }
    }
}
