//! Home Assistant string tables
//!
//! Integrations ship their user-facing text in `strings.json`. This crate
//! loads those tables, resolves `[%key:...%]` references against the core
//! strings and other integrations, flattens them into resource keys and
//! checks them against the `strings.json` schema.

pub mod error;
pub mod reference;
pub mod schema;
pub mod table;

pub use error::{TranslationError, TranslationResult};
pub use reference::{find_references, KeyReference, ReferenceContext};
pub use schema::{validate_strings, StringsProblem};
pub use table::{generate_translations, StringTable, TranslationCatalog};
