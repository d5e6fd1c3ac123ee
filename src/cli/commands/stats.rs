//! Stats command - Aggregate statistics over the saved audit run

use std::path::Path;
use tracing::debug;

use super::{emit, state_store, StatsArgs, StatsFormat};
use crate::appends::Appends;
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, StatsRenderer, TerminalOutput};
use crate::config::Config;
use crate::error::RepoAuditError;
use crate::state::StateStore;
use crate::stats::aggregate;

pub fn execute(args: StatsArgs, config_path: Option<&Path>) -> Result<i32, RepoAuditError> {
    let config = Config::load_or_default(config_path)?;
    let run = state_store(&config, args.state.as_deref()).load()?;

    let appends = Appends::load_optional(config.appends.as_deref())?;
    for full_name in run.index() {
        for append in appends.for_repository(full_name) {
            debug!(
                repository = %full_name,
                fields = ?append.fields,
                "Repository annotation"
            );
        }
    }

    let stats = aggregate(&run);

    let renderer: Box<dyn StatsRenderer> = match args.format {
        StatsFormat::Terminal => Box::new(TerminalOutput::new()),
        StatsFormat::Json => Box::new(JsonOutput::new()),
    };
    let mut output = renderer.render_stats(&stats)?;
    if args.format == StatsFormat::Json {
        output.push('\n');
    }
    emit(&output, None)?;

    Ok(exit_codes::SUCCESS)
}
