//! Command line and config file handling for the `msgbench` binary.
//!
//! Settings are layered: built-in defaults, then the TOML file named by
//! `--config`, then environment variables and flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::seed::DEFAULT_SEED_COUNT;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "msgbench.toml";

#[derive(Parser, Debug)]
#[command(
    name = "msgbench",
    version,
    about = "Round-trip latency benchmark for an HTTP message store"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Path to a TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "MSGBENCH_CONFIG", global = true)]
    pub config: PathBuf,

    /// Base URL of the message store
    #[arg(long, env = "MSGBENCH_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Concurrent posts in multi-user scenarios
    #[arg(long, short = 'w', global = true)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, global = true)]
    pub timeout_secs: Option<f64>,

    /// Report file, overwritten on every run
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the four benchmark scenarios and write the report
    Run,
    /// Post numbered messages to fill the store
    Seed {
        /// How many messages to post
        #[arg(long, short = 'n', default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,
    },
    /// Print stored messages starting at an offset
    List {
        /// Number of messages to skip
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Print the number of stored messages
    Count,
}

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub workers: Option<usize>,
    pub timeout_secs: Option<f64>,
    pub report: Option<PathBuf>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Parse a config file.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, [`Error::Config`] if it is not
/// valid TOML for [`FileConfig`].
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("bad config {}: {e}", path.display())))
}

fn timeout_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::Config(format!("invalid timeout {secs}: {e}")))
}

/// Merge defaults, the config file and command line arguments.
///
/// A config file that does not exist is skipped; one that exists but cannot
/// be parsed is an error.
///
/// # Errors
///
/// [`Error::Config`] or [`Error::Io`] for a broken config file, and
/// [`Error::Config`] if the merged configuration is invalid.
pub fn effective_config(args: &GlobalArgs) -> Result<Config> {
    let file = if args.config.exists() {
        load_file_config(&args.config)?
    } else {
        FileConfig::default()
    };

    let mut config = Config::new();
    for (name, value) in &file.headers {
        config = config.with_header(name.as_str(), value.as_str());
    }
    if let Some(base_url) = args.base_url.clone().or(file.base_url) {
        config = config.with_base_url(base_url);
    }
    if let Some(workers) = args.workers.or(file.workers) {
        config = config.with_workers(workers);
    }
    if let Some(secs) = args.timeout_secs.or(file.timeout_secs) {
        config = config.with_request_timeout(timeout_from_secs(secs)?);
    }
    if let Some(report) = args.report.clone().or(file.report) {
        config = config.with_report_path(report);
    }

    config.validate()?;
    Ok(config)
}
