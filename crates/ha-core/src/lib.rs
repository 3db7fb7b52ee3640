//! Core types for the integration metadata checker
//!
//! This crate provides the types shared by every loader and validator:
//! slug rules, ServiceKey, Integration, Manifest, Config and ValidationIssue.

mod integration;
mod issue;
mod manifest;
mod slug;

pub use integration::{Action, Config, Integration};
pub use issue::ValidationIssue;
pub use manifest::Manifest;
pub use slug::{is_valid_domain, is_valid_slug, ServiceKey, ServiceKeyError};

/// Directory names under `components/` that are not integrations
pub const IGNORED_COMPONENT_DIRS: &[&str] = &["__pycache__"];
