//! Report command - Per-repository results of the saved audit run

use colored::Colorize;
use std::path::Path;

use super::{emit, state_store, ReportArgs, ReportFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, MarkdownReport, ReportRenderer, TerminalOutput};
use crate::config::Config;
use crate::error::RepoAuditError;
use crate::state::StateStore;

pub fn execute(args: ReportArgs, config_path: Option<&Path>) -> Result<i32, RepoAuditError> {
    let config = Config::load_or_default(config_path)?;
    let run = state_store(&config, args.state.as_deref()).load()?;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        ReportFormat::Terminal => {
            Box::new(TerminalOutput::new().failures_only(args.failures_only))
        }
        ReportFormat::Json => Box::new(JsonOutput::new()),
        ReportFormat::Markdown => {
            Box::new(MarkdownReport::new().failures_only(args.failures_only))
        }
    };

    let report = renderer.render_report(&run)?;
    emit(&report, args.output.as_deref())?;

    if let Some(output) = &args.output {
        println!(
            "{} Report written to: {}",
            "Success:".green().bold(),
            output.display().to_string().cyan()
        );
    }

    Ok(exit_codes::SUCCESS)
}
