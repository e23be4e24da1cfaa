//! Cluster monitor CLI
//!
//! A command-line tool for ordering collected event intervals into a
//! timeline, decoding locators and messages, and resolving alert allowances
//! from historical data.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{allowance, locator, timeline};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Cluster monitor CLI
#[derive(Parser)]
#[command(name = "monitorctl")]
#[command(author, version, about = "CLI for cluster event timelines and alert allowances", long_about = None)]
pub struct Cli {
    /// Output format (falls back to `default_format` in the config, then table)
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Order intervals from a JSON file into a timeline
    Timeline {
        /// JSON file containing an array of intervals
        file: PathBuf,

        /// Only show intervals in this namespace
        #[arg(long, short)]
        namespace: Option<String>,

        /// Only show intervals whose locator contains these tokens
        #[arg(long, short)]
        locator: Option<String>,
    },

    /// Decode a pod or container locator
    Locator {
        /// Locator string, e.g. "ns/default pod/web uid/123"
        locator: String,
    },

    /// Decode the annotations of an interval message
    Message {
        /// Message text, e.g. "reason/Created pod created"
        message: String,
    },

    /// Show flake and fail thresholds for an alert
    Allowance {
        /// Historical alert data (JSON array)
        #[arg(long, env = "MONITOR_HISTORICAL_DATA_PATH")]
        data: Option<PathBuf>,

        /// Never fail, only flake (grace period for new alerts)
        #[arg(long)]
        never_fail: bool,

        #[command(flatten)]
        key: allowance::AlertKeyArgs,
    },
}

impl Cli {
    /// The `--format` flag, falling back to the configured default
    fn output_format(&self, config: &config::MonitorConfig) -> output::OutputFormat {
        self.format.unwrap_or(config.default_format)
    }
}

fn init_tracing(config: &config::MonitorConfig, verbose: bool) {
    let default_filter = if verbose { "debug" } else { config.log_filter.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::MonitorConfig::load()?;
    init_tracing(&config, cli.verbose);
    debug!(?config, "Loaded configuration");
    let format = cli.output_format(&config);

    match cli.command {
        Commands::Timeline {
            file,
            namespace,
            locator,
        } => {
            timeline::show_timeline(&file, namespace, locator, format)?;
        }
        Commands::Locator { locator } => {
            locator::show_locator(&locator, format)?;
        }
        Commands::Message { message } => {
            locator::show_message(&message, format)?;
        }
        Commands::Allowance {
            data,
            never_fail,
            key,
        } => {
            allowance::show_allowance(
                data,
                config.historical_data_path.as_deref(),
                key,
                never_fail,
                format,
            )?;
        }
    }

    Ok(())
}
