//! Integration metadata checker
//!
//! Validates the declarative files every integration ships
//! (`services.yaml`, `strings.json`) and the repository's issue-report forms,
//! and regenerates derived files such as `translations/en.json`.

pub mod discovery;
pub mod error;
pub mod plugins;
pub mod report;

pub use discovery::discover_integrations;
pub use error::{HassfestError, HassfestResult};
pub use plugins::{load_plugins, Plugin, PLUGIN_NAMES};
pub use report::Report;

use ha_core::{Action, Config, Integration};
use ha_service_registry::ServiceDescriptions;
use std::sync::Arc;
use tracing::{debug, info};

/// Run the enabled plugins over the discovered integrations
///
/// Integration checks run on the blocking pool, split into one batch per
/// available core. Repository-level checks and generation run afterwards.
pub async fn run(mut config: Config) -> HassfestResult<Report> {
    let services = Arc::new(ServiceDescriptions::new());

    let setup_config = config.clone();
    let setup_services = services.clone();
    let (plugins, integrations) = tokio::task::spawn_blocking(move || {
        let plugins = load_plugins(&setup_config, setup_services)?;
        let integrations = discover_integrations(&setup_config)?;
        Ok::<_, HassfestError>((plugins, integrations))
    })
    .await??;
    let plugins: Arc<Vec<Box<dyn Plugin>>> = Arc::new(plugins);

    info!(
        "Validating {} integrations with plugins: {}",
        integrations.len(),
        plugins.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
    );

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let batch_size = integrations.len().div_ceil(workers).max(1);

    let mut tasks = Vec::new();
    let mut remaining = integrations;
    while !remaining.is_empty() {
        let rest = remaining.split_off(batch_size.min(remaining.len()));
        let mut batch = std::mem::replace(&mut remaining, rest);
        let plugins = plugins.clone();
        let mut task_config = config.clone();
        task_config.errors.clear();

        tasks.push(tokio::task::spawn_blocking(move || {
            for plugin in plugins.iter().filter(|p| !p.core_only()) {
                debug!("Running {} on {} integrations", plugin.name(), batch.len());
                plugin.validate(&mut batch, &mut task_config);
            }
            (batch, task_config.errors)
        }));
    }

    let mut integrations: Vec<Integration> = Vec::new();
    for task in tasks {
        let (batch, errors) = task.await?;
        integrations.extend(batch);
        config.errors.extend(errors);
    }

    let (integrations, config) = tokio::task::spawn_blocking(move || {
        let mut integrations = integrations;
        for plugin in plugins.iter().filter(|p| p.core_only()) {
            plugin.validate(&mut integrations, &mut config);
        }
        if config.action == Action::Generate {
            for plugin in plugins.iter() {
                plugin.generate(&mut integrations, &mut config);
            }
        }
        (integrations, config)
    })
    .await?;

    Ok(Report {
        errors: config.errors,
        integrations,
        service_count: services.service_count(),
    })
}
