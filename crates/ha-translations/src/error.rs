//! Translation errors

use thiserror::Error;

/// Result type for translation operations
pub type TranslationResult<T> = Result<T, TranslationError>;

#[derive(Debug, Error)]
pub enum TranslationError {
    /// The strings file could not be loaded
    #[error(transparent)]
    Load(#[from] ha_config::ConfigError),

    #[error("invalid key reference '{0}'")]
    InvalidReference(String),

    #[error("invalid reference {0}: key does not exist")]
    UnresolvedReference(String),

    #[error("invalid reference {0}: points to a value that is not a string")]
    NotAString(String),

    #[error("circular reference {0}")]
    CircularReference(String),
}
