//! Moral Drift CLI
//!
//! Runs a single simulation or a parameter sweep and emits the results as
//! JSON. Logs go to stderr so stdout stays machine-readable.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use drift_core::config::DEFAULT_CONFIG_PATH;
use drift_core::output::emit_json;
use drift_core::{run_batch, ConfigSpace, ExperimentConfig, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "moral_drift")]
#[command(about = "Agent-based simulation of a stigmatized creature's moral drift")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single simulation and emit its tick records
    Run(RunArgs),
    /// Sweep the configured parameter grid and emit per-cell statistics
    Batch(BatchArgs),
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Experiment file (defaults to drift.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks per run
    #[arg(long)]
    ticks: Option<u64>,

    /// Write JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Independent runs per cell
    #[arg(long)]
    replicates: Option<u32>,

    /// Worker threads; 1 runs sequentially
    #[arg(long)]
    threads: Option<usize>,
}

fn load_experiment(common: &CommonArgs) -> Result<ExperimentConfig, String> {
    let mut experiment = match &common.config {
        Some(path) => ExperimentConfig::load(path).map_err(|e| e.to_string())?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            ExperimentConfig::load(DEFAULT_CONFIG_PATH).map_err(|e| e.to_string())?
        }
        None => ExperimentConfig::default(),
    };

    if let Some(seed) = common.seed {
        experiment.simulation.random_seed = Some(seed);
    }
    if let Some(ticks) = common.ticks {
        experiment.simulation.max_ticks = ticks;
    }
    Ok(experiment)
}

fn run_single(args: RunArgs) -> Result<ExitCode, String> {
    let experiment = load_experiment(&args.common)?;
    let simulation = Simulation::new(&experiment.simulation).map_err(|e| e.to_string())?;

    tracing::info!(seed = simulation.seed(), "Starting run");
    let record = simulation.run_to_completion();
    tracing::info!(
        ticks = record.len(),
        termination = ?record.termination,
        final_state = ?record.terminal_state(),
        "Run finished"
    );

    emit_json(args.common.output.as_deref(), &record).map_err(|e| e.to_string())?;
    Ok(ExitCode::SUCCESS)
}

fn run_sweep(args: BatchArgs) -> Result<ExitCode, String> {
    let mut experiment = load_experiment(&args.common)?;
    if let Some(replicates) = args.replicates {
        experiment.sweep.replicate_count = replicates;
    }
    if let Some(threads) = args.threads {
        experiment.sweep.worker_threads = threads;
    }

    let results = run_batch(&ConfigSpace::from(experiment)).map_err(|e| e.to_string())?;
    emit_json(args.common.output.as_deref(), &results).map_err(|e| e.to_string())?;

    if results.failed_cells().is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_default_config() -> Result<ExitCode, String> {
    let toml = ExperimentConfig::default()
        .to_toml()
        .map_err(|e| e.to_string())?;
    print!("{}", toml);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drift_core=info,moral_drift=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run_single(args),
        Command::Batch(args) => run_sweep(args),
        Command::DefaultConfig => print_default_config(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}
