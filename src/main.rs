use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use vibeos::storage::MemoryStore;
use vibeos::{Manifest, ReconciliationEngine, ReconciliationResult};

fn setup_logging(default_level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vibeos")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("vibeos.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let manifest = Manifest::from_file(path).context(format!("Failed to load manifest {}", path.display()))?;
    manifest.validate().context("Manifest failed validation")?;
    Ok(manifest)
}

fn handle_validate(path: &Path) -> Result<()> {
    let manifest = load_manifest(path)?;
    let spec = &manifest.spec;

    println!(
        "{} {} v{}",
        "Valid:".green(),
        manifest.metadata.name,
        manifest.metadata.version
    );
    println!("  Intent: {}", spec.intent);
    println!(
        "  Stack: {} / {} (testing: {})",
        spec.constraints.framework,
        spec.constraints.language,
        spec.constraints.testing.join(", ")
    );
    println!(
        "  States: {}  Behaviors: {}",
        spec.functional_spec.states.len(),
        spec.functional_spec.behaviors.len()
    );
    Ok(())
}

async fn handle_reconcile(
    path: &Path,
    max_loops: Option<u32>,
    max_stagnation: Option<usize>,
    threshold: Option<f64>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let manifest = load_manifest(path)?;
    let id = manifest.metadata.name.clone();

    let store = MemoryStore::new();
    store.set_manifest(&id, manifest)?;

    let crash_config = config
        .reconcile
        .to_crash_loop_config(max_loops, max_stagnation, threshold);
    let llm = Arc::new(config.llm.build_client().context("Failed to create LLM client")?);
    let engine = ReconciliationEngine::with_llm(llm, crash_config);

    if !json {
        println!(
            "{} {} (max {} loops)",
            "Reconciling:".cyan(),
            id,
            crash_config.max_total_loops
        );
    }

    let mut manifest = store.require_manifest(&id)?;
    let result = engine.reconcile(&mut manifest).await;

    store.clear_loop_history(&id)?;
    for entry in &result.loop_history {
        store.append_loop_result(&id, entry.clone())?;
    }
    store.set_manifest(&id, manifest)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if result.success {
        Ok(())
    } else {
        Err(eyre!(
            "Reconciliation failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        ))
    }
}

fn print_summary(result: &ReconciliationResult) {
    for entry in &result.loop_history {
        let diff = if entry.is_unparseable() {
            "unparseable".yellow()
        } else if entry.is_converged() {
            "0".green()
        } else {
            entry.divergence.to_string().red()
        };
        println!("  Loop {:>3}: diff {}", entry.loop_number, diff);
    }

    if result.success {
        println!("{} converged in {} loops", "Ready:".green(), result.total_loops);
    } else {
        println!(
            "{} after {} loops: {}",
            "Failed:".red(),
            result.total_loops,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Reconcile {
            manifest,
            max_loops,
            max_stagnation,
            threshold,
            json,
        } => handle_reconcile(manifest, *max_loops, *max_stagnation, *threshold, *json, config).await,
        Commands::Validate { manifest } => handle_validate(manifest),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging; RUST_LOG wins over the configured level
    setup_logging(config.log_level.as_deref().unwrap_or("info")).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
