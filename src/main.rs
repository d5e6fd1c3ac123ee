//! repoaudit - Audit the repositories of a GitHub owner against declarative rules
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repoaudit::cli::commands;
use repoaudit::cli::{exit_codes, Cli, Commands};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() {
                exit_codes::INVALID_ARGS
            } else {
                exit_codes::SUCCESS
            });
        }
    };

    setup_logging(cli.verbose);

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("Error: cannot change to '{}': {}", dir.display(), e);
            std::process::exit(exit_codes::INVALID_ARGS);
        }
    }

    let config = cli.config.as_deref();
    let result: anyhow::Result<i32> = match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Validate(args) => commands::validate::execute(args, config).map_err(Into::into),
        Commands::Audit(args) => commands::audit::execute(args, config).map_err(Into::into),
        Commands::Stats(args) => commands::stats::execute(args, config).map_err(Into::into),
        Commands::Report(args) => commands::report::execute(args, config).map_err(Into::into),
        Commands::Compare(args) => commands::compare::execute(args, config).map_err(Into::into),
        Commands::GenerateMan(args) => commands::generate_man::execute(args).map_err(Into::into),
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
