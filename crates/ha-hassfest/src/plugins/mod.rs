//! Checker plugins
//!
//! Each plugin validates one kind of metadata file. Integration plugins are
//! handed a slice of integrations and attach issues to them; core plugins
//! check repository-level files and report through the run configuration.

mod issue_form;
mod services;
mod translations;

pub use issue_form::IssueFormPlugin;
pub use services::ServicesPlugin;
pub use translations::TranslationsPlugin;

use crate::error::{HassfestError, HassfestResult};
use ha_core::{Config, Integration};
use ha_service_registry::SharedServiceDescriptions;

/// Names of all plugins, in the order they run
pub const PLUGIN_NAMES: &[&str] = &["services", "translations", "issue_form"];

pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the plugin checks repository-level files only
    fn core_only(&self) -> bool {
        false
    }

    fn validate(&self, integrations: &mut [Integration], config: &mut Config);

    /// Regenerate derived files
    fn generate(&self, _integrations: &mut [Integration], _config: &mut Config) {}
}

/// Instantiate the plugins enabled in `config`
pub fn load_plugins(
    config: &Config,
    services: SharedServiceDescriptions,
) -> HassfestResult<Vec<Box<dyn Plugin>>> {
    if let Some(unknown) = config
        .plugins
        .iter()
        .find(|p| !PLUGIN_NAMES.contains(&p.as_str()))
    {
        return Err(HassfestError::UnknownPlugin {
            name: unknown.clone(),
            available: PLUGIN_NAMES.join(", "),
        });
    }

    let mut plugins: Vec<Box<dyn Plugin>> = Vec::new();
    if config.plugin_enabled("services") {
        plugins.push(Box::new(ServicesPlugin::new(services)));
    }
    if config.plugin_enabled("translations") {
        plugins.push(Box::new(TranslationsPlugin::load(config)?));
    }
    if config.plugin_enabled("issue_form") {
        plugins.push(Box::new(IssueFormPlugin));
    }
    Ok(plugins)
}
