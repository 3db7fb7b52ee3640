//! YAML schema documents
//!
//! Documents are converted to JSON data while they are read, so include tags
//! are resolved and every other tag is unwrapped to its value.

use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value as Json};
use serde_yaml::value::TaggedValue;
use serde_yaml::{Number, Value as Yaml};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Tags whose value depends on the machine the document is read on
const RUNTIME_TAGS: &[&str] = &["!secret", "!env_var"];

/// What an include tag points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Include {
    File,
    Dir(DirInclude),
}

/// How the YAML files of an included directory are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirInclude {
    /// One list item per file
    List,
    /// Concatenation of the files' lists
    MergeList,
    /// File stem to file content
    Named,
    /// Union of the files' mappings
    MergeNamed,
}

impl Include {
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "!include" => Include::File,
            "!include_dir_list" => Include::Dir(DirInclude::List),
            "!include_dir_merge_list" => Include::Dir(DirInclude::MergeList),
            "!include_dir_named" => Include::Dir(DirInclude::Named),
            "!include_dir_merge_named" => Include::Dir(DirInclude::MergeNamed),
            _ => return None,
        })
    }
}

/// Reads one schema document together with everything it includes
#[derive(Debug, Default)]
pub struct DocumentLoader {
    /// Files currently being read, outermost first
    chain: Vec<PathBuf>,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a YAML file as JSON data
    pub fn load(&mut self, path: &Path) -> ConfigResult<Json> {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.chain.contains(&key) {
            return Err(ConfigError::CircularInclude {
                path: path.to_path_buf(),
            });
        }

        debug!("Loading YAML document {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound && !self.chain.is_empty() {
                ConfigError::IncludeNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        self.chain.push(key);
        let result = self.parse(&content, path);
        self.chain.pop();
        result
    }

    /// Parse YAML text read from `source`; includes resolve next to it
    pub fn parse(&mut self, content: &str, source: &Path) -> ConfigResult<Json> {
        let yaml: Yaml = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source.to_path_buf(),
            source: e,
        })?;
        self.convert(yaml, source)
    }

    fn convert(&mut self, value: Yaml, source: &Path) -> ConfigResult<Json> {
        Ok(match value {
            Yaml::Null => Json::Null,
            Yaml::Bool(b) => Json::Bool(b),
            Yaml::Number(n) => number_to_json(&n)?,
            Yaml::String(s) => Json::String(s),
            Yaml::Sequence(items) => Json::Array(
                items
                    .into_iter()
                    .map(|item| self.convert(item, source))
                    .collect::<ConfigResult<_>>()?,
            ),
            Yaml::Mapping(map) => {
                let mut object = Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key_to_string(key)?, self.convert(value, source)?);
                }
                Json::Object(object)
            }
            Yaml::Tagged(tagged) => self.convert_tagged(*tagged, source)?,
        })
    }

    fn convert_tagged(&mut self, tagged: TaggedValue, source: &Path) -> ConfigResult<Json> {
        let tag = tagged.tag.to_string();
        trace!("Resolving {} in {:?}", tag, source);

        if RUNTIME_TAGS.contains(&tag.as_str()) {
            return Err(ConfigError::UnsupportedTag {
                tag,
                path: source.to_path_buf(),
            });
        }

        match Include::from_tag(&tag) {
            Some(Include::File) => {
                let target = include_target(&tagged.value, source)?;
                self.load(&target)
            }
            Some(Include::Dir(kind)) => {
                let target = include_target(&tagged.value, source)?;
                self.include_dir(kind, &target)
            }
            None => self.convert(tagged.value, source),
        }
    }

    fn include_dir(&mut self, kind: DirInclude, dir: &Path) -> ConfigResult<Json> {
        debug!("Including {:?} as {:?}", dir, kind);
        let files = yaml_files(dir)?;

        Ok(match kind {
            DirInclude::List => Json::Array(
                files
                    .iter()
                    .map(|file| self.load(file))
                    .collect::<ConfigResult<_>>()?,
            ),
            DirInclude::MergeList => {
                let mut merged = Vec::new();
                for file in &files {
                    match self.load(file)? {
                        Json::Array(items) => merged.extend(items),
                        Json::Null => {}
                        other => merged.push(other),
                    }
                }
                Json::Array(merged)
            }
            DirInclude::Named => {
                let mut named = Map::with_capacity(files.len());
                for file in &files {
                    let name = file
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default()
                        .to_string();
                    named.insert(name, self.load(file)?);
                }
                Json::Object(named)
            }
            DirInclude::MergeNamed => {
                let mut merged = Map::new();
                for file in &files {
                    match self.load(file)? {
                        Json::Object(map) => merged.extend(map),
                        Json::Null => {}
                        other => {
                            return Err(ConfigError::NotAMapping {
                                path: file.clone(),
                                found: kind_of(&other),
                            })
                        }
                    }
                }
                Json::Object(merged)
            }
        })
    }
}

/// Path named by an include tag, relative to the including file
fn include_target(value: &Yaml, source: &Path) -> ConfigResult<PathBuf> {
    let Yaml::String(target) = value else {
        return Err(ConfigError::InvalidIncludePath {
            path: format!("{:?}", value),
            reason: "path must be a string".to_string(),
        });
    };

    Ok(match source.parent() {
        Some(dir) => dir.join(target),
        None => PathBuf::from(target),
    })
}

/// The `.yaml` and `.yml` files of a directory, sorted by name
fn yaml_files(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConfigError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| ConfigError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();

    files.sort();
    Ok(files)
}

fn number_to_json(n: &Number) -> ConfigResult<Json> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Json::Number)
        .ok_or_else(|| ConfigError::Convert {
            reason: format!("number {} is not representable in JSON", n),
        })
}

fn key_to_string(key: Yaml) -> ConfigResult<String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(ConfigError::Convert {
            reason: format!("mapping key must be a scalar, found {:?}", other),
        }),
    }
}

fn kind_of(value: &Json) -> &'static str {
    match value {
        Json::Null => "nothing",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "a list",
        Json::Object(_) => "a mapping",
    }
}

/// Schema documents are mappings; an empty document is an empty mapping
fn document_root(value: Json, path: &Path) -> ConfigResult<Json> {
    match value {
        Json::Null => Ok(Json::Object(Map::new())),
        Json::Object(_) => Ok(value),
        other => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
    }
}

/// Load a YAML schema document as JSON data
///
/// Includes are resolved relative to the including file.
pub fn load_yaml_document(path: impl AsRef<Path>) -> ConfigResult<Json> {
    let path = path.as_ref();
    let value = DocumentLoader::new().load(path)?;
    document_root(value, path)
}

/// Parse YAML schema text as JSON data
///
/// `source` names the document in errors; includes resolve next to it.
pub fn parse_yaml_document(content: &str, source: impl AsRef<Path>) -> ConfigResult<Json> {
    let source = source.as_ref();
    let value = DocumentLoader::new().parse(content, source)?;
    document_root(value, source)
}
