//! Schema document loading
//!
//! Service definitions and issue forms are YAML, string tables are JSON.
//! Both end up as `serde_json::Value` so every validator works on one value
//! model. A YAML document must be a mapping and may be split with Home
//! Assistant's include tags:
//!
//! - `!include path` - Include another YAML file
//! - `!include_dir_list dir` - Include all YAML files in a directory as a list
//! - `!include_dir_merge_list dir` - Merge lists from all YAML files
//! - `!include_dir_named dir` - Include all YAML files as a mapping
//! - `!include_dir_merge_named dir` - Merge mappings from all YAML files
//!
//! `!secret` and `!env_var` are rejected: a schema document must not depend
//! on the machine it is checked on.
//!
//! # Example
//!
//! ```ignore
//! use ha_config::{load_json, load_yaml_document};
//!
//! let services = load_yaml_document("homeassistant/components/abode/services.yaml")?;
//! let strings = load_json("homeassistant/components/abode/strings.json")?;
//! ```

mod error;
mod json;
mod loader;

pub use error::{ConfigError, ConfigResult};
pub use json::{load_json, load_json_string};
pub use loader::{load_yaml_document, parse_yaml_document, DocumentLoader};
