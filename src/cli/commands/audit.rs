//! Audit command - Fetch repositories, evaluate the rules and save the run

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

use super::{emit, state_store, AuditArgs};
use crate::audit::AuditRun;
use crate::cli::exit_codes;
use crate::config::Config;
use crate::error::{RepoAuditError, StateError};
use crate::providers::file::FileSource;
use crate::providers::github::GitHubProvider;
use crate::providers::RepositorySource;
use crate::rules::definition::load_rules;
use crate::rules::{AuditEngine, RuleStatus};
use crate::state::StateStore;

pub fn execute(args: AuditArgs, config_path: Option<&Path>) -> Result<i32, RepoAuditError> {
    let started = Instant::now();
    let config = Config::load_or_default(config_path)?;

    // The rule set is validated before anything is fetched
    let definitions = load_rules(&config.rules)?;
    let engine = AuditEngine::new(&definitions)?;

    let source: Box<dyn RepositorySource> =
        match args.repositories.or_else(|| config.repositories.clone()) {
            Some(path) => Box::new(FileSource::new(path)),
            None => {
                let owner = match args.owner.as_deref() {
                    Some(owner) => owner,
                    None => config.require_owner()?,
                };
                Box::new(GitHubProvider::new(owner))
            }
        };

    let repositories = fetch_with_spinner(source.as_ref())?;
    info!(
        source = %source.name(),
        repositories = repositories.len(),
        "Fetched repositories"
    );

    let run = engine.run(repositories)?;

    if args.dry_run {
        println!("{} Dry run, state not saved", "Note:".yellow().bold());
    } else {
        let store = state_store(&config, None);
        store.save(&run)?;
        println!(
            "{} Audit saved to {}",
            "Success:".green().bold(),
            store.path().display().to_string().cyan()
        );
    }

    if let Some(output) = args.output.as_deref() {
        let json = serde_json::to_string_pretty(&run).map_err(StateError::Encode)?;
        emit(&json, Some(output))?;
    }

    let (failures, errors) = print_summary(&run, started.elapsed());

    Ok(if failures > 0 {
        exit_codes::RULE_FAILURES
    } else if errors > 0 {
        exit_codes::EVALUATION_ERRORS
    } else {
        exit_codes::SUCCESS
    })
}

fn fetch_with_spinner(
    source: &dyn RepositorySource,
) -> Result<Vec<crate::audit::RepositorySnapshot>, RepoAuditError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching repositories from {}", source.name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = source.fetch();
    spinner.finish_and_clear();
    result
}

/// Print per-status totals; returns (failures, errors)
fn print_summary(run: &AuditRun, elapsed: Duration) -> (usize, usize) {
    let count = |status: RuleStatus| -> usize {
        run.iter()
            .map(|(_, results)| results.count_by_status(status))
            .sum()
    };

    let success = count(RuleStatus::Success);
    let failures = count(RuleStatus::Failure);
    let not_applicable = count(RuleStatus::NotApplicable);
    let errors = count(RuleStatus::Error);

    println!(
        "Audited {} repositories in {:.2}s: {} success, {} failure, {} not-applicable, {} error",
        run.len().to_string().yellow(),
        elapsed.as_secs_f64(),
        success.to_string().green(),
        failures.to_string().red(),
        not_applicable,
        errors.to_string().yellow()
    );

    (failures, errors)
}
