//! # CLI Module
//!
//! This module defines the command-line interface for repoaudit using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `init` | Write a starter configuration and rule file |
//! | `validate` | Check the rule file without fetching anything |
//! | `audit` | Fetch repositories, evaluate rules and save the run |
//! | `stats` | Aggregate statistics over the saved run |
//! | `report` | Per-repository results of the saved run |
//! | `compare` | Compare two saved runs |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `-C, --directory <DIR>` - Working directory (defaults to current directory)
//!
//! ## Examples
//!
//! ```bash
//! repoaudit init --owner hashicorp
//! repoaudit audit
//! repoaudit stats
//! repoaudit report --failures-only --format markdown -o audit.md
//! repoaudit compare --base last-week.json
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{
    AuditArgs, CompareArgs, GenerateManArgs, InitArgs, ReportArgs, StatsArgs, ValidateArgs,
};

/// repoaudit - Audit the repositories of a GitHub owner against declarative rules
#[derive(Parser, Debug)]
#[command(name = "repoaudit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "REPOAUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter configuration and rule file
    Init(InitArgs),

    /// Validate the rule file
    Validate(ValidateArgs),

    /// Fetch repositories, evaluate every rule and save the run
    Audit(AuditArgs),

    /// Show aggregated statistics for the saved run
    Stats(StatsArgs),

    /// Show per-repository rule results for the saved run
    Report(ReportArgs),

    /// Compare two saved audit runs
    Compare(CompareArgs),

    /// Generate man page (hidden, for packaging)
    #[command(hide = true)]
    GenerateMan(GenerateManArgs),
}
