//! Error types for document loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loading operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a schema document
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML
    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Failed to parse JSON
    #[error("failed to parse JSON in {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid include path
    #[error("invalid include path '{path}': {reason}")]
    InvalidIncludePath { path: String, reason: String },

    /// Include file not found
    #[error("included file not found: {path}")]
    IncludeNotFound { path: PathBuf },

    /// Directory not found for include_dir_*
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Circular include detected
    #[error("circular include detected: {path}")]
    CircularInclude { path: PathBuf },

    /// Tag that only makes sense in a runtime configuration
    #[error("tag '{tag}' is not allowed in {path}")]
    UnsupportedTag { tag: String, path: PathBuf },

    /// A schema document, or a file merged into one, that is not a mapping
    #[error("{path} must contain a mapping, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    /// YAML value with no JSON equivalent
    #[error("cannot convert YAML value: {reason}")]
    Convert { reason: String },
}
