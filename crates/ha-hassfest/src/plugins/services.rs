//! `services.yaml` checks

use super::Plugin;
use ha_core::{Config, Integration};
use ha_service_registry::SharedServiceDescriptions;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, instrument};

const PLUGIN: &str = "services";

/// Calls that register services at runtime
fn registration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"hass\.services\.(?:async_)?register\(|async_register_entity_service|async_register_admin_service",
        )
        .expect("valid regex")
    })
}

/// Loads every integration's `services.yaml` into a shared description store
pub struct ServicesPlugin {
    descriptions: SharedServiceDescriptions,
}

impl ServicesPlugin {
    pub fn new(descriptions: SharedServiceDescriptions) -> Self {
        Self { descriptions }
    }

    #[instrument(skip_all, fields(domain = %integration.domain))]
    fn validate_integration(&self, integration: &mut Integration) {
        let path = integration.file("services.yaml");

        if !path.exists() {
            if registers_services(&integration.path) {
                integration.add_error(PLUGIN, "Registers services but has no services.yaml");
            }
            return;
        }

        let document = match ha_config::load_yaml_document(&path) {
            Ok(document) => document,
            Err(e) => {
                integration.add_error(PLUGIN, format!("Unable to load services.yaml: {}", e));
                return;
            }
        };

        for error in self
            .descriptions
            .load_services_yaml(&integration.domain, &document)
        {
            integration.add_error(PLUGIN, format!("Invalid services.yaml: {}", error));
        }

        debug!(
            "{} services described",
            self.descriptions.domain_services(&integration.domain).len()
        );
    }
}

impl Plugin for ServicesPlugin {
    fn name(&self) -> &'static str {
        PLUGIN
    }

    fn validate(&self, integrations: &mut [Integration], _config: &mut Config) {
        for integration in integrations {
            self.validate_integration(integration);
        }
    }
}

/// Whether any Python module of the integration, at any depth, registers a service
fn registers_services(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };

    entries.flatten().map(|entry| entry.path()).any(|path| {
        if path.is_dir() {
            registers_services(&path)
        } else if path.extension().and_then(|e| e.to_str()) == Some("py") {
            std::fs::read_to_string(&path)
                .is_ok_and(|source| registration_regex().is_match(&source))
        } else {
            false
        }
    })
}
