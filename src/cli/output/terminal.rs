//! Terminal output formatting with colors

use colored::Colorize;

use super::{display_order, ReportRenderer, StatsRenderer};
use crate::audit::AuditRun;
use crate::error::RepoAuditError;
use crate::rules::{RuleResult, RuleStatus};
use crate::stats::{percentage, Stats, SUM_COUNTERS, TOTAL};

const LABEL_WIDTH: usize = 22;
const VALUE_WIDTH: usize = 8;

pub struct TerminalOutput {
    failures_only: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            failures_only: false,
        }
    }

    /// Only list failures and errors in reports
    pub fn failures_only(mut self, failures_only: bool) -> Self {
        self.failures_only = failures_only;
        self
    }

    fn format_header(&self, run: &AuditRun) -> String {
        format!(
            "\n{} v{}\n\n{} {}\n{} {}\n",
            "repoaudit".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Audited:".dimmed(),
            run.created_at().format("%Y-%m-%d %H:%M:%S UTC").to_string().white().bold(),
            "Repositories:".dimmed(),
            run.len().to_string().yellow()
        )
    }

    fn format_result(&self, result: &RuleResult) -> String {
        let marker = match result.status {
            RuleStatus::Success => "✓".green(),
            RuleStatus::Failure => "✗".red(),
            RuleStatus::NotApplicable => "-".dimmed(),
            RuleStatus::Error => "!".yellow(),
        };

        let mut line = format!("    {} {}", marker, result.name.cyan());
        if let Some(detail) = &result.detail {
            line.push_str(&format!(" {}", detail.dimmed()));
        }
        line.push('\n');
        line
    }

    fn format_totals(&self, run: &AuditRun) -> String {
        let mut counts = [0usize; 4];
        for (_, results) in run.iter() {
            for (slot, status) in counts.iter_mut().zip(RuleStatus::ALL) {
                *slot += results.count_by_status(status);
            }
        }

        format!(
            "\n{}\n  {} {}  {} {}  {} {}  {} {}\n",
            "━".repeat(50).dimmed(),
            "success".green(),
            counts[0],
            "failure".red(),
            counts[1],
            "not-applicable".dimmed(),
            counts[2],
            "error".yellow(),
            counts[3]
        )
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// One statistics line: label padded to 22 columns, value padded to 8, and a
/// percentage of `TOTAL` for repository counters when `TOTAL` is not zero
pub fn format_stat_line(name: &str, value: u64, total: u64) -> String {
    let mut line = format!(
        "{}:{}{:<width$}",
        name.replace('_', " "),
        " ".repeat(LABEL_WIDTH.saturating_sub(name.len())),
        value,
        width = VALUE_WIDTH
    );

    if name != TOTAL && !SUM_COUNTERS.contains(&name) {
        if let Some(pct) = percentage(value, total) {
            line.push_str(&format!("  ({:5.2} %)", pct));
        }
    }

    line.trim_end().to_string()
}

impl StatsRenderer for TerminalOutput {
    fn render_stats(&self, stats: &Stats) -> Result<String, RepoAuditError> {
        let mut output = String::new();
        for name in display_order(stats) {
            output.push_str(&format_stat_line(name, stats.get(name), stats.total()));
            output.push('\n');
        }
        Ok(output)
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, run: &AuditRun) -> Result<String, RepoAuditError> {
        let mut output = self.format_header(run);

        for (repo, results) in run.iter() {
            let shown: Vec<&RuleResult> = results
                .rules
                .iter()
                .filter(|r| {
                    !self.failures_only
                        || matches!(r.status, RuleStatus::Failure | RuleStatus::Error)
                })
                .collect();

            if self.failures_only && shown.is_empty() {
                continue;
            }

            output.push_str(&format!("\n  {}\n", repo.full_name.white().bold()));
            for result in shown {
                output.push_str(&self.format_result(result));
            }
        }

        output.push_str(&self.format_totals(run));
        Ok(output)
    }
}
