//! Main entry point for the matchmaking simulator
//!
//! Loads the configuration, runs one simulation per configured matchmaking
//! strategy and prints a report for each of them.

use anyhow::Result;
use clap::Parser;
use matchmaking_sim::config::{validate_config, SimulationConfig, StrategyKind};
use matchmaking_sim::metrics::MetricsCollector;
use matchmaking_sim::runner::{RunReport, Runner};
use std::path::PathBuf;
use tracing::{error, info};

/// Matchmaking Simulator - compare skill-based matchmaking strategies
#[derive(Parser)]
#[command(
    name = "matchmaking-sim",
    version,
    about = "Round-based simulator for skill-based matchmaking strategies",
    long_about = "Runs a simulated player population through one or more matchmaking \
                 strategies, each on its own engine, and reports queue times, lobby \
                 fairness and rating outcomes for every strategy."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Rounds override
    #[arg(short, long, value_name = "ROUNDS", help = "Override rounds per strategy")]
    rounds: Option<u64>,

    /// Seed override
    #[arg(short, long, value_name = "SEED", help = "Override the random seed")]
    seed: Option<u64>,

    /// Strategies override
    #[arg(
        long = "strategy",
        value_enum,
        value_name = "STRATEGY",
        help = "Strategy to simulate, may be repeated (overrides configuration)"
    )]
    strategies: Vec<StrategyKind>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print reports as JSON
    #[arg(long, help = "Print run reports as JSON instead of text")]
    json: bool,

    /// Print Prometheus metrics after the runs
    #[arg(long, help = "Print collected Prometheus metrics after the runs")]
    metrics: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without simulating")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with run information
fn display_startup_banner(config: &SimulationConfig) {
    info!("Matchmaking Simulator");
    info!("   Name: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Rounds: {}", config.simulation.rounds);
    info!("   Seed: {}", config.simulation.seed);
    let strategies: Vec<String> = config
        .matchmaking
        .strategies
        .iter()
        .map(ToString::to_string)
        .collect();
    info!("   Strategies: {}", strategies.join(", "));
    info!("   Rating engine: {:?}", config.rating.engine);
    info!("   Team size: {}", config.matchmaking.team_size);
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        SimulationConfig::from_file(config_path)?
    } else {
        SimulationConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if !args.strategies.is_empty() {
        config.matchmaking.strategies = args.strategies.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

/// Run every configured strategy on its own engine, concurrently
async fn run_strategies(
    config: &SimulationConfig,
    collector: &MetricsCollector,
) -> Result<Vec<RunReport>> {
    let band = (
        config.simulation.min_report_mmr,
        config.simulation.max_report_mmr,
    );
    let mut handles = Vec::new();
    for &strategy in &config.matchmaking.strategies {
        let config = config.clone();
        let metrics = collector.for_strategy(&strategy.to_string());
        handles.push(tokio::task::spawn_blocking(move || {
            let mut runner = Runner::from_config(&config, strategy)?.with_metrics(metrics);
            runner.run(config.simulation.rounds, band)
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await??);
    }
    Ok(reports)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without simulating");
        return Ok(());
    }

    display_startup_banner(&config);

    let collector = MetricsCollector::new()?;
    let reports = match run_strategies(&config, &collector).await {
        Ok(reports) => reports,
        Err(e) => {
            error!("Simulation failed: {:#}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report);
        }
    }

    if args.metrics {
        print!("{}", collector.gather_text()?);
    }

    info!("Simulated {} strategies", reports.len());
    Ok(())
}
