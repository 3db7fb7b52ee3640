//! Service description errors

use thiserror::Error;

/// Result type for service description operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur when loading or using service descriptions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("service not found: {domain}.{service}")]
    NotFound { domain: String, service: String },

    #[error("invalid services.yaml: {0}")]
    InvalidDocument(String),

    #[error("invalid service name '{service}': {reason}")]
    InvalidName { service: String, reason: String },

    #[error("invalid description for {domain}.{service}: {reason}")]
    InvalidDescriptor {
        domain: String,
        service: String,
        reason: String,
    },

    #[error("invalid service data: {0}")]
    InvalidData(String),
}
