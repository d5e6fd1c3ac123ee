//! Output formatting module for CLI

mod json;
mod markdown;
mod terminal;

pub use json::JsonOutput;
pub use markdown::MarkdownReport;
pub use terminal::TerminalOutput;

use crate::audit::AuditRun;
use crate::error::RepoAuditError;
use crate::stats::Stats;

/// Trait for rendering per-repository audit results
pub trait ReportRenderer {
    fn render_report(&self, run: &AuditRun) -> Result<String, RepoAuditError>;
}

/// Trait for rendering aggregated statistics
pub trait StatsRenderer {
    fn render_stats(&self, stats: &Stats) -> Result<String, RepoAuditError>;
}

/// Statistic names in display order: built-in counters, then rules by name
pub fn display_order(stats: &Stats) -> Vec<&str> {
    crate::stats::DISPLAY_ORDER
        .iter()
        .copied()
        .chain(stats.rule_names())
        .collect()
}
