// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! unoise command-line driver
//!
//! Runs a master-equation evolution described by a YAML configuration and
//! prints one JSON line of observables per output time.
//!
//! # Usage
//!
//! ```bash
//! # Evolve with default configuration (or ./unoise.yaml)
//! unoise evolve
//!
//! # Evolve with custom config and a larger truncation
//! unoise evolve --config run.yaml --truncation 20
//!
//! # Show effective configuration
//! unoise config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unified_noise::{analytics, Config, MasterEquationSolver, Result, VERSION};

/// Master-equation engine for a trapped mode with thermal and jump noise
#[derive(Parser)]
#[command(name = "unoise")]
#[command(author = "Unified Noise Contributors")]
#[command(version = VERSION)]
#[command(about = "Matrix-free Lindblad evolution of a truncated bosonic mode")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve the initial state over the configured time grid
    Evolve {
        /// Fock-space truncation size
        #[arg(long)]
        truncation: Option<usize>,

        /// Final time [s]
        #[arg(long)]
        stop: Option<f64>,

        /// Number of grid intervals
        #[arg(long)]
        steps: Option<usize>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

/// One line of evolve output.
#[derive(Debug, Serialize)]
struct Sample {
    t: f64,
    trace: f64,
    n_mean: f64,
    purity: f64,
    top_population: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging.level);

    match cli.command {
        Commands::Evolve {
            truncation,
            stop,
            steps,
        } => {
            if let Some(n) = truncation {
                config.solver.truncation = n;
            }
            if let Some(t) = stop {
                config.grid.stop = t;
            }
            if let Some(k) = steps {
                config.grid.steps = k;
            }

            config.validate()?;
            run_evolve(&config)?;
        }

        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn run_evolve(config: &Config) -> Result<()> {
    let n = config.solver.truncation;
    let solver = MasterEquationSolver::with_options(
        n,
        config.model.clone(),
        config.solver.propagator_options(),
    )?;

    let rho0 = config.initial_state.build(n)?;
    let grid = config.grid.points();

    info!(
        version = VERSION,
        truncation = n,
        points = grid.len(),
        stop = config.grid.stop,
        "starting evolution"
    );

    let states = solver.evolve(&rho0, &grid)?;

    for (t, rho) in grid.iter().skip(1).zip(states.iter()) {
        let sample = Sample {
            t: *t,
            trace: analytics::trace(rho).re,
            n_mean: analytics::n_expectation(rho, solver.number_operator()),
            purity: analytics::purity(rho),
            top_population: analytics::top_level_population(rho),
        };
        println!("{}", serde_json::to_string(&sample)?);
    }

    Ok(())
}
