//! hassfest
//!
//! Command-line entry point of the integration metadata checker.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ha_core::{Action, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Validate,
    Generate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Validate integration metadata files
#[derive(Parser, Debug)]
#[command(name = "hassfest")]
#[command(about = "Validate services.yaml, strings.json and issue forms")]
struct Args {
    /// Repository root containing homeassistant/ and .github/
    #[arg(long, env = "HA_CORE_PATH", default_value = ".")]
    root: PathBuf,

    /// Only check this integration directory (repeatable)
    #[arg(long = "integration-path")]
    integration_paths: Vec<PathBuf>,

    /// Comma-separated plugins to run (default: all)
    #[arg(long, value_delimiter = ',')]
    plugins: Vec<String>,

    #[arg(long, value_enum, default_value = "validate")]
    action: ActionArg,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut config = Config::new(&args.root);
    config.specific_integrations = args.integration_paths;
    config.plugins = args.plugins;
    config.action = match args.action {
        ActionArg::Validate => Action::Validate,
        ActionArg::Generate => Action::Generate,
    };
    debug!("Configuration: {:?}", config);

    info!("Checking {:?}", args.root);
    let report = ha_hassfest::run(config)
        .await
        .with_context(|| format!("failed to check {}", args.root.display()))?;

    match args.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report.to_json())?),
    }

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
