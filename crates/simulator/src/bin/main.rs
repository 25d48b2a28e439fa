//! Flowsim CLI
//!
//! Validate and run process model simulations described in JSON.
//!
//! # Example
//!
//! ```bash
//! # Run a model as written and print the result JSON
//! flowsim run model.json
//!
//! # Override the seed and horizon, with progress logging
//! RUST_LOG=info flowsim run model.json --seed 7 --duration 960 --progress
//!
//! # Check a model without running it
//! flowsim validate model.json
//! ```

use clap::{Parser, Subcommand};
use flowsim_simulation::EngineConfig;
use flowsim_simulator::{load_model, RunError, Simulator, SimulatorConfig};
use flowsim_types::TimeUnit;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowsim")]
#[command(version, about = "Discrete-event simulation of process models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a model and print the result as JSON on stdout
    Run {
        /// Path to the model JSON
        model: PathBuf,

        /// Random seed, overriding the model's
        #[arg(long)]
        seed: Option<i64>,

        /// Simulation horizon, overriding the model's
        #[arg(short = 'd', long)]
        duration: Option<f64>,

        /// Warmup period, overriding the model's
        #[arg(short = 'w', long)]
        warmup: Option<f64>,

        /// Time unit label (sec, min, hour)
        #[arg(long, value_parser = parse_time_unit)]
        time_unit: Option<TimeUnit>,

        /// Safety cap on processed events
        #[arg(long, default_value = "1000000")]
        max_events: u64,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,

        /// Log progress every 10% of simulated time
        #[arg(long)]
        progress: bool,
    },

    /// Validate a model and list every problem found
    Validate {
        /// Path to the model JSON
        model: PathBuf,
    },
}

fn parse_time_unit(s: &str) -> Result<TimeUnit, String> {
    s.parse()
}

fn main() -> ExitCode {
    // Logs go to stderr so that stdout holds only the result.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> Result<ExitCode, RunError> {
    match command {
        Commands::Run {
            model,
            seed,
            duration,
            warmup,
            time_unit,
            max_events,
            pretty,
            progress,
        } => {
            let mut config = SimulatorConfig::new()
                .with_engine(EngineConfig::new().with_max_events(max_events))
                .with_progress_logging(progress);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(duration) = duration {
                config = config.with_duration(duration);
            }
            if let Some(warmup) = warmup {
                config = config.with_warmup_period(warmup);
            }
            if let Some(time_unit) = time_unit {
                config = config.with_time_unit(time_unit);
            }

            let model = load_model(&model)?;
            let report = Simulator::new(config).run(&model)?;

            info!(
                seed = report.config.seed,
                duration = report.config.duration,
                events = report.stats.events_processed,
                dropped = report.stats.entities_dropped,
                in_flight = report.stats.entities_in_flight,
                "Run finished"
            );

            let json = if pretty {
                serde_json::to_string_pretty(&report.result)?
            } else {
                serde_json::to_string(&report.result)?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate { model } => {
            let model = load_model(&model)?;
            let report = Simulator::default().validate(&model);
            if report.is_valid() {
                println!("Model \"{}\" is valid", model.id);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Model \"{}\" is invalid:\n{report}", model.id);
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
