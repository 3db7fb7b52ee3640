//! String tables loaded from `strings.json`

use crate::error::TranslationResult;
use crate::reference::{find_references, KeyReference, ReferenceContext};
use ha_config::load_json;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// The strings of one integration (or of core)
#[derive(Debug, Clone, PartialEq)]
pub struct StringTable {
    domain: String,
    strings: Value,
}

impl StringTable {
    pub fn new(domain: impl Into<String>, strings: Value) -> Self {
        Self {
            domain: domain.into(),
            strings,
        }
    }

    /// Load a `strings.json` file
    pub fn load(domain: impl Into<String>, path: &Path) -> TranslationResult<Self> {
        let strings = load_json(path)?;
        Ok(Self::new(domain, strings))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn strings(&self) -> &Value {
        &self.strings
    }

    pub fn into_strings(self) -> Value {
        self.strings
    }

    /// Look up a `::`-separated key path
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split("::")
            .try_fold(&self.strings, |current, part| current.get(part))
    }

    /// Every reference used in this table, with the key path it appears at
    pub fn references(&self) -> Vec<(String, KeyReference)> {
        find_references(&self.strings)
    }

    /// Flatten to dot-separated resource keys under `prefix`
    ///
    /// Unresolvable references are kept verbatim.
    pub fn flatten(&self, prefix: &str, context: &ReferenceContext) -> BTreeMap<String, String> {
        let mut output = BTreeMap::new();
        flatten_value(&self.strings, prefix, context, &mut output);
        output
    }
}

fn flatten_value(
    value: &Value,
    prefix: &str,
    context: &ReferenceContext,
    output: &mut BTreeMap<String, String>,
) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(val, &new_prefix, context, output);
            }
        }
        Value::String(s) => {
            output.insert(prefix.to_string(), context.resolve_string_lossy(s));
        }
        _ => {}
    }
}

/// Resolve every reference in a table, producing the `translations/en.json` document
///
/// Fails on the first broken reference.
pub fn generate_translations(
    table: &StringTable,
    context: &ReferenceContext,
) -> TranslationResult<Value> {
    resolve_value(table.strings(), context)
}

fn resolve_value(value: &Value, context: &ReferenceContext) -> TranslationResult<Value> {
    Ok(match value {
        Value::Object(map) => {
            let mut resolved = Map::with_capacity(map.len());
            for (key, val) in map {
                resolved.insert(key.clone(), resolve_value(val, context)?);
            }
            Value::Object(resolved)
        }
        Value::String(s) => Value::String(context.resolve_string(s)?),
        other => other.clone(),
    })
}

/// Core strings plus the string tables of a set of integrations
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    context: ReferenceContext,
    tables: BTreeMap<String, StringTable>,
}

impl TranslationCatalog {
    pub fn new(core_strings: Value) -> Self {
        Self {
            context: ReferenceContext::new(core_strings),
            tables: BTreeMap::new(),
        }
    }

    /// Load core strings and every `<components_dir>/<domain>/strings.json`
    ///
    /// A missing core file yields an empty core table. Integrations whose
    /// strings cannot be parsed are skipped with a warning.
    pub fn load(core_strings_path: &Path, components_dir: &Path) -> TranslationResult<Self> {
        let core = if core_strings_path.exists() {
            load_json(core_strings_path)?
        } else {
            warn!("Core strings not found at {:?}", core_strings_path);
            Value::Object(Map::new())
        };
        let mut catalog = Self::new(core);

        let Ok(entries) = std::fs::read_dir(components_dir) else {
            return Ok(catalog);
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let strings_path = path.join("strings.json");
            if !strings_path.exists() {
                continue;
            }
            let Some(domain) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match StringTable::load(domain, &strings_path) {
                Ok(table) => catalog.insert(table),
                Err(e) => warn!("Skipping strings of {}: {}", domain, e),
            }
        }

        debug!("Loaded strings for {} integrations", catalog.tables.len());
        Ok(catalog)
    }

    pub fn insert(&mut self, table: StringTable) {
        self.context
            .add_component(table.domain(), table.strings().clone());
        self.tables.insert(table.domain().to_string(), table);
    }

    pub fn context(&self) -> &ReferenceContext {
        &self.context
    }

    pub fn table(&self, domain: &str) -> Option<&StringTable> {
        self.tables.get(domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Flattened `{"resources": {...}}` for the given integrations
    ///
    /// `category` restricts the output to one top-level section such as
    /// `config`; `None` includes the whole table.
    pub fn get_translations(
        &self,
        category: Option<&str>,
        integrations: Option<&[String]>,
    ) -> Value {
        let domains: Vec<&str> = match integrations {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => self.domains().collect(),
        };

        let mut resources = BTreeMap::new();
        for domain in domains {
            let Some(table) = self.tables.get(domain) else {
                continue;
            };
            match category {
                Some(cat) => {
                    if let Some(section) = table.strings().get(cat) {
                        flatten_value(
                            section,
                            &format!("component.{}.{}", domain, cat),
                            &self.context,
                            &mut resources,
                        );
                    }
                }
                None => {
                    resources.extend(table.flatten(&format!("component.{}", domain), &self.context))
                }
            }
        }

        serde_json::json!({ "resources": resources })
    }
}
