//! CLI commands module

pub mod audit;
pub mod compare;
pub mod generate_man;
pub mod init;
pub mod report;
pub mod stats;
pub mod validate;

use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::RepoAuditError;
use crate::state::JsonStateStore;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// GitHub organization or user to audit
    #[arg(short, long, value_name = "OWNER")]
    pub owner: Option<String>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Skip interactive prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Skip checking that the GitHub CLI is available
    #[arg(long)]
    pub skip_checks: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Rule file to validate (defaults to the configured one)
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// GitHub organization or user (overrides the configuration)
    #[arg(long, value_name = "OWNER")]
    pub owner: Option<String>,

    /// Read repositories from a JSON file instead of GitHub
    #[arg(long, value_name = "FILE")]
    pub repositories: Option<PathBuf>,

    /// Evaluate without saving the run
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the run as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Saved audit run to read (defaults to the configured storage)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: StatsFormat,
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Saved audit run to read (defaults to the configured storage)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Output format (terminal, json, markdown)
    #[arg(short, long, default_value = "terminal")]
    pub format: ReportFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only list failures and errors
    #[arg(long)]
    pub failures_only: bool,
}

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Path to the base (before) audit run
    #[arg(long, value_name = "FILE")]
    pub base: PathBuf,

    /// Path to the head (after) audit run (defaults to the configured storage)
    #[arg(long, value_name = "FILE")]
    pub head: Option<PathBuf>,

    /// Output format (terminal, json, markdown)
    #[arg(short, long, default_value = "terminal")]
    pub format: CompareFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 1 if any rule regressed
    #[arg(long)]
    pub fail_on_regression: bool,
}

/// Arguments for the generate-man command
#[derive(Args, Debug)]
pub struct GenerateManArgs {
    /// Directory to write repoaudit.1 into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

/// Output format for stats command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum StatsFormat {
    Terminal,
    Json,
}

/// Output format for report command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Markdown,
}

/// Output format for compare command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum CompareFormat {
    Terminal,
    Json,
    Markdown,
}

/// State store for an explicit `--state` path, or the configured storage
fn state_store(config: &Config, explicit: Option<&Path>) -> JsonStateStore {
    match explicit {
        Some(path) => JsonStateStore::new(Path::new("."), path),
        None => JsonStateStore::new(Path::new("."), &config.storage),
    }
}

/// Write command output to a file, or print it
fn emit(output: &str, path: Option<&Path>) -> Result<(), RepoAuditError> {
    match path {
        Some(path) => std::fs::write(path, output).map_err(|e| {
            RepoAuditError::Output {
                path: path.display().to_string(),
                source: e,
            }
        }),
        None => {
            print!("{}", output);
            Ok(())
        }
    }
}
