//! Issue form errors

use thiserror::Error;

pub type IssueFormResult<T> = Result<T, IssueFormError>;

#[derive(Debug, Error)]
pub enum IssueFormError {
    #[error(transparent)]
    Load(#[from] ha_config::ConfigError),

    /// The document does not match the issue-form structure
    #[error("invalid issue form: {0}")]
    Invalid(#[from] serde_json::Error),
}
