use std::path::PathBuf;
use thiserror::Error;

pub type HassfestResult<T> = Result<T, HassfestError>;

#[derive(Debug, Error)]
pub enum HassfestError {
    #[error("unknown plugin '{name}', available plugins: {available}")]
    UnknownPlugin { name: String, available: String },

    #[error("components directory not found: {0:?}")]
    ComponentsNotFound(PathBuf),

    #[error("integration path is not a directory: {0:?}")]
    NotAnIntegration(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to load core strings: {0}")]
    CoreStrings(#[from] ha_translations::TranslationError),

    #[error("validation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
