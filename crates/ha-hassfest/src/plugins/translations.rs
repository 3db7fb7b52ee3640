//! `strings.json` checks and `translations/en.json` generation

use super::Plugin;
use crate::error::HassfestResult;
use ha_core::{Action, Config, Integration};
use ha_translations::{
    generate_translations, validate_strings, ReferenceContext, StringTable, TranslationCatalog,
};
use serde_json::Value;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const PLUGIN: &str = "translations";

pub struct TranslationsPlugin {
    catalog: TranslationCatalog,
}

impl TranslationsPlugin {
    /// Load core strings and the strings of every component
    pub fn load(config: &Config) -> HassfestResult<Self> {
        let catalog =
            TranslationCatalog::load(&config.core_strings_path(), &config.components_dir())?;
        Ok(Self { catalog })
    }

    pub fn new(catalog: TranslationCatalog) -> Self {
        Self { catalog }
    }

    /// The integration's table and a context that can resolve references into it
    ///
    /// Integrations outside the components directory are not in the catalog
    /// and get loaded on demand.
    fn table_for(
        &self,
        integration: &Integration,
    ) -> Result<Option<(Cow<'_, StringTable>, Cow<'_, ReferenceContext>)>, String> {
        if let Some(table) = self.catalog.table(&integration.domain) {
            if table_path(integration).exists() {
                return Ok(Some((Cow::Borrowed(table), Cow::Borrowed(self.catalog.context()))));
            }
        }

        let path = table_path(integration);
        if !path.exists() {
            return Ok(None);
        }

        let table = StringTable::load(integration.domain.clone(), &path)
            .map_err(|e| format!("Invalid strings.json: {}", e))?;
        let context = self
            .catalog
            .context()
            .clone()
            .with_component(&integration.domain, table.strings().clone());
        Ok(Some((Cow::Owned(table), Cow::Owned(context))))
    }

    fn validate_integration(&self, integration: &mut Integration, action: Action) {
        let (table, context) = match self.table_for(integration) {
            Ok(Some(found)) => found,
            Ok(None) => {
                if integration.config_flow() {
                    integration.add_error(PLUGIN, "Integration has a config flow but no strings.json");
                }
                return;
            }
            Err(message) => {
                integration.add_error(PLUGIN, message);
                return;
            }
        };

        let problems = validate_strings(&table, &context, integration.config_flow());
        for problem in &problems {
            integration.add_error(PLUGIN, format!("Invalid strings.json: {}", problem));
        }
        if !problems.is_empty() || action == Action::Generate {
            return;
        }

        // Generated file must match what generate would write
        let Ok(expected) = generate_translations(&table, &context) else {
            return;
        };
        let current = ha_config::load_json(en_path(integration)).ok();
        if current.as_ref() != Some(&expected) {
            integration.add_fixable_error(
                PLUGIN,
                "translations/en.json is outdated, run with --action generate",
            );
        }
    }

    fn generate_integration(&self, integration: &mut Integration) -> Option<Value> {
        if integration.has_errors() {
            return None;
        }
        let (table, context) = self.table_for(integration).ok()??;
        match generate_translations(&table, &context) {
            Ok(generated) => Some(generated),
            Err(e) => {
                integration.add_error(PLUGIN, format!("Unable to generate translations: {}", e));
                None
            }
        }
    }
}

impl Plugin for TranslationsPlugin {
    fn name(&self) -> &'static str {
        PLUGIN
    }

    fn validate(&self, integrations: &mut [Integration], config: &mut Config) {
        for integration in integrations {
            self.validate_integration(integration, config.action);
        }
    }

    fn generate(&self, integrations: &mut [Integration], _config: &mut Config) {
        let mut written = 0;
        for integration in integrations {
            let Some(generated) = self.generate_integration(integration) else {
                continue;
            };

            let path = en_path(integration);
            let result = path
                .parent()
                .map(std::fs::create_dir_all)
                .transpose()
                .and_then(|_| {
                    let content = serde_json::to_string_pretty(&generated)
                        .map_err(std::io::Error::other)?;
                    std::fs::write(&path, content + "\n")
                });

            match result {
                Ok(()) => {
                    debug!("Wrote {:?}", path);
                    written += 1;
                }
                Err(e) => {
                    warn!("Failed to write {:?}: {}", path, e);
                    integration.add_error(PLUGIN, format!("Unable to write en.json: {}", e));
                }
            }
        }
        info!("Generated translations for {} integrations", written);
    }
}

fn table_path(integration: &Integration) -> PathBuf {
    integration.file("strings.json")
}

fn en_path(integration: &Integration) -> PathBuf {
    integration.file("translations").join("en.json")
}
