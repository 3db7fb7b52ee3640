//! Finding the integrations to check

use crate::error::{HassfestError, HassfestResult};
use ha_core::{Config, Integration, Manifest, IGNORED_COMPONENT_DIRS};
use std::path::Path;
use tracing::{debug, warn};

/// Integrations selected by the configuration, sorted by domain
///
/// Uses the explicitly requested directories when there are any, otherwise
/// every directory under `homeassistant/components`.
pub fn discover_integrations(config: &Config) -> HassfestResult<Vec<Integration>> {
    let mut integrations = Vec::new();

    if !config.specific_integrations.is_empty() {
        for path in &config.specific_integrations {
            if !path.is_dir() {
                return Err(HassfestError::NotAnIntegration(path.clone()));
            }
            if let Some(integration) = load_integration(path) {
                integrations.push(integration);
            }
        }
    } else {
        let components = config.components_dir();
        if !components.is_dir() {
            return Err(HassfestError::ComponentsNotFound(components));
        }

        for entry in std::fs::read_dir(&components)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!("Skipping non UTF-8 directory {:?}", path);
                continue;
            };
            if name.starts_with('.') || IGNORED_COMPONENT_DIRS.contains(&name) {
                continue;
            }
            if let Some(integration) = load_integration(&path) {
                integrations.push(integration);
            }
        }
    }

    integrations.sort_by(|a, b| a.domain.cmp(&b.domain));
    debug!("Discovered {} integrations", integrations.len());
    Ok(integrations)
}

/// Create the integration record and attach its manifest
fn load_integration(path: &Path) -> Option<Integration> {
    let mut integration = Integration::load(path)?;

    let manifest_path = integration.file("manifest.json");
    if !manifest_path.exists() {
        integration.add_error("core", "Integration is missing manifest.json");
        return Some(integration);
    }

    let manifest = ha_config::load_json(&manifest_path)
        .map_err(|e| e.to_string())
        .and_then(|value| serde_json::from_value::<Manifest>(value).map_err(|e| e.to_string()));

    match manifest {
        Ok(manifest) => {
            if manifest.domain != integration.domain {
                let message = format!(
                    "Domain '{}' in manifest.json does not match directory name",
                    manifest.domain
                );
                integration.add_error("core", message);
            }
            integration.manifest = Some(manifest);
        }
        Err(e) => integration.add_error("core", format!("Invalid manifest.json: {}", e)),
    }

    Some(integration)
}
