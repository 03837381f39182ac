// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Crossbench CLI
//!
//! Command-line interface for running cross-backend runtime-cost measurements.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossbench_core::{Config, ConfigLoader};

mod commands;
mod format;
mod host;

/// Crossbench - measure memory, threading and scheduling costs across backends
#[derive(Parser)]
#[command(name = "crossbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a benchmark request against one backend
    Run {
        /// Backend identifier: Rust, C or C++
        #[arg(short, long)]
        backend: String,

        /// Kind selector: 0 for every kind, 1..=7 for one kind (see `list`)
        #[arg(short, long, default_value_t = 0)]
        kind: u32,

        /// Trials per parameter point (overrides configuration)
        #[arg(short, long)]
        trials: Option<u32>,

        /// Outlier threshold in standard deviations (overrides configuration)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output directory root (overrides configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List benchmark kinds, sweeps and backends
    List,

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },

    /// Show host information recorded with every run
    Host {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run {
            backend,
            kind,
            trials,
            threshold,
            output,
        } => {
            let config = load_config(cli.config.as_deref())?;
            commands::run::execute(
                &config,
                commands::run::RunArgs {
                    backend,
                    kind,
                    trials,
                    threshold,
                    output,
                },
            )
        }
        Commands::List => commands::list::execute(),
        Commands::Validate { file } => commands::validate::execute(&file),
        Commands::Host { json } => commands::host::execute(json),
    }
}
