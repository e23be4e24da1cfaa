//! Configuration management for the CLI
//!
//! Values come from `~/.config/monitorctl/config.json` (optional) and
//! `MONITOR_*` environment variables, with the environment taking precedence.
//! Command line flags override both.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Output format used when `--format` is not given
    #[serde(default)]
    pub default_format: OutputFormat,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Historical alert data used by `allowance` when `--data` is omitted
    #[serde(default)]
    pub historical_data_path: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::default(),
            log_filter: default_log_filter(),
            log_json: false,
            historical_data_path: None,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from the config file and environment
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = Self::config_path() {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(false),
            );
        }

        Self::from_sources(builder, config::Environment::with_prefix("MONITOR"))
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: config::Environment,
    ) -> Result<Self> {
        builder
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("monitorctl").join("config.json"))
    }
}
