//! JSON documents

use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a JSON file
pub fn load_json(path: impl AsRef<Path>) -> ConfigResult<serde_json::Value> {
    let path = path.as_ref();
    debug!("Loading JSON file: {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_json_string(&content, path)
}

/// Parse JSON content, attributing errors to `source_path`
pub fn load_json_string(content: &str, source_path: &Path) -> ConfigResult<serde_json::Value> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseJson {
        path: source_path.to_path_buf(),
        source: e,
    })
}
