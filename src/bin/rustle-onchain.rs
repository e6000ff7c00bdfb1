use anyhow::{bail, Context, Result};
use clap::Parser;
use rustle_onchain::config::{load_parameters, DeployConfig};
use rustle_onchain::execution::batch_futures;
use rustle_onchain::serialization::from_json_str;
use rustle_onchain::validation::{validate_module, DeploymentParameters, FsArtifactResolver};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "rustle-onchain")]
#[command(about = "Validate a stored on-chain deployment and show its execution batches")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct RustleOnchainCli {
    /// Serialized deployment JSON file
    deployment: PathBuf,

    /// Deployment config (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Module parameters file (YAML or JSON)
    #[arg(short, long)]
    parameters: Option<PathBuf>,

    /// Directory holding `<ContractName>.json` artifacts
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    /// Account address, may be repeated; overrides the config accounts
    #[arg(long = "account")]
    accounts: Vec<String>,

    /// Print the batches as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = RustleOnchainCli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Starting rustle-onchain v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => DeployConfig::load(path)?,
        None => DeployConfig::default(),
    };

    let content = std::fs::read_to_string(&cli.deployment)
        .with_context(|| format!("Failed to read {}", cli.deployment.display()))?;
    let deployment = from_json_str(&content)?;

    if deployment.details != config.details() {
        warn!(
            "Deployment targets {} ({}) but the config is for {} ({})",
            deployment.details.network_name,
            deployment.details.chain_id,
            config.network_name,
            config.chain_id
        );
    }

    let parameters = match &cli.parameters {
        Some(path) => load_parameters(path)?,
        None => DeploymentParameters::new(),
    };
    let accounts = if cli.accounts.is_empty() {
        config.accounts.clone()
    } else {
        cli.accounts.clone()
    };

    match cli.artifacts.as_ref().or(config.artifacts_dir.as_ref()) {
        Some(artifacts_dir) => {
            let resolver = FsArtifactResolver::new(artifacts_dir);
            let report = validate_module(&deployment.module, &resolver, &parameters, &accounts);
            if !report.is_valid() {
                for failure in &report.failures {
                    error!("{}: {}", failure.future_id, failure.error);
                }
                bail!(
                    "{} of {} futures failed validation",
                    report.failures.len(),
                    report.validated
                );
            }
            info!("All {} futures are valid", report.validated);
        }
        None => warn!("No artifacts directory given, skipping validation"),
    }

    let batches = batch_futures(&deployment.module)?;

    if cli.json {
        let ids: Vec<Vec<&str>> = batches
            .iter()
            .map(|batch| batch.iter().map(|future| future.id.as_str()).collect())
            .collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else {
        println!(
            "Deployment of {} on {} ({})",
            deployment.module.id, deployment.details.network_name, deployment.details.chain_id
        );
        for (index, batch) in batches.iter().enumerate() {
            println!("Batch #{}", index + 1);
            for future in batch {
                println!("  {future}");
            }
        }
    }

    Ok(())
}
