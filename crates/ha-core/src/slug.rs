//! Slug rules and the `domain.service` key

use std::fmt;
use thiserror::Error;

/// Error type for invalid service keys
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceKeyError {
    #[error("domain cannot be empty")]
    EmptyDomain,

    #[error("service cannot be empty")]
    EmptyService,

    #[error(
        "domain contains invalid characters (must be lowercase alphanumeric with underscores, cannot start/end with underscore or contain double underscores)"
    )]
    InvalidDomainChars,

    #[error(
        "service contains invalid characters (must be lowercase alphanumeric with underscores, cannot start/end with underscore)"
    )]
    InvalidServiceChars,
}

/// Check if a string is a valid slug
///
/// Lowercase alphanumeric and underscores, non-empty, cannot start or end
/// with an underscore. Matches `(?!_)[\da-z_]+(?<!_)`.
pub fn is_valid_slug(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Check if a string is a valid integration domain (a slug without `__`)
pub fn is_valid_domain(s: &str) -> bool {
    !s.contains("__") && is_valid_slug(s)
}

/// Identifies a described service (e.g., "light.turn_on")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey {
    domain: String,
    service: String,
}

impl ServiceKey {
    /// Create a new key from domain and service parts
    pub fn new(
        domain: impl Into<String>,
        service: impl Into<String>,
    ) -> Result<Self, ServiceKeyError> {
        let domain = domain.into();
        let service = service.into();

        if domain.is_empty() {
            return Err(ServiceKeyError::EmptyDomain);
        }
        if service.is_empty() {
            return Err(ServiceKeyError::EmptyService);
        }
        if !is_valid_domain(&domain) {
            return Err(ServiceKeyError::InvalidDomainChars);
        }
        if !is_valid_slug(&service) {
            return Err(ServiceKeyError::InvalidServiceChars);
        }

        Ok(Self { domain, service })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.service)
    }
}
