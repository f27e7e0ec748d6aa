// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Frost CLI
//!
//! Command-line interface for the Frost simulation scaffold.

use clap::{Parser, Subcommand};
use frost_core::{ConfigLoader, SimulationClock, TimePrecision};

mod commands;
mod logging;

/// Frost - discrete-event simulation scaffold
#[derive(Parser)]
#[command(name = "frost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to $FROST_CONFIG, then resources/frost_config.yml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the effective configuration
    Config,

    /// Convert a time value between units
    Convert {
        /// Time value to convert
        #[arg(allow_hyphen_values = true)]
        time: f64,

        /// Source unit (NSECS, USECS, MSECS, SECS, MINUTES, HOURS, DAYS, WEEKS)
        #[arg(long)]
        from: TimePrecision,

        /// Target unit
        #[arg(long)]
        to: TimePrecision,

        /// Round half to even instead of flooring
        #[arg(long)]
        round: bool,

        /// Print the exact fractional value
        #[arg(long, conflicts_with = "round")]
        float: bool,
    },

    /// Run the controller/motor demonstration simulation
    Demo {
        /// Number of simulation ticks to run
        #[arg(short, long, default_value_t = 10)]
        ticks: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => ConfigLoader::load_from_env()?,
    };

    // Log lines are stamped with simulation time, not wall-clock time
    let clock = SimulationClock::new();
    logging::init(&config, cli.verbose, clock.clone());

    match cli.command {
        Commands::Config => commands::config::execute(&config, cli.config.as_deref()),
        Commands::Convert {
            time,
            from,
            to,
            round,
            float,
        } => commands::convert::execute(time, from, to, round, float),
        Commands::Demo { ticks } => commands::demo::execute(ticks, clock),
    }
}
