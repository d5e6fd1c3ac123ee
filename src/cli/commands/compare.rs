//! Compare command - Compare two saved audit runs

use colored::Colorize;
use std::path::Path;

use super::{emit, state_store, CompareArgs, CompareFormat};
use crate::cli::exit_codes;
use crate::compare::{compare_runs, format_json, format_markdown, format_terminal};
use crate::config::Config;
use crate::error::{RepoAuditError, StateError};
use crate::state::{JsonStateStore, StateStore};

fn label(path: &Path, fallback: &str) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

pub fn execute(args: CompareArgs, config_path: Option<&Path>) -> Result<i32, RepoAuditError> {
    let config = Config::load_or_default(config_path)?;

    let base_store = JsonStateStore::new(Path::new("."), &args.base);
    let head_store = state_store(&config, args.head.as_deref());

    let base = base_store.load()?;
    let head = head_store.load()?;

    let report = compare_runs(
        &base,
        &head,
        &label(base_store.path(), "base"),
        &label(head_store.path(), "head"),
    );

    let output = match args.format {
        CompareFormat::Terminal => format_terminal(&report),
        CompareFormat::Json => format_json(&report).map_err(StateError::Encode)?,
        CompareFormat::Markdown => format_markdown(&report),
    };

    emit(&output, args.output.as_deref())?;
    if let Some(path) = &args.output {
        println!(
            "{} Comparison report written to: {}",
            "Success:".green().bold(),
            path.display().to_string().cyan()
        );
    }

    if args.fail_on_regression && report.has_regressions() {
        eprintln!(
            "{} {} rule result(s) regressed.",
            "Error:".red().bold(),
            report.regressions().count()
        );
        Ok(exit_codes::RULE_FAILURES)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
