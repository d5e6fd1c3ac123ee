//! Markdown report formatting

use super::ReportRenderer;
use crate::audit::AuditRun;
use crate::error::RepoAuditError;
use crate::rules::RuleStatus;

pub struct MarkdownReport {
    failures_only: bool,
}

impl MarkdownReport {
    pub fn new() -> Self {
        Self {
            failures_only: false,
        }
    }

    pub fn failures_only(mut self, failures_only: bool) -> Self {
        self.failures_only = failures_only;
        self
    }
}

impl Default for MarkdownReport {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl ReportRenderer for MarkdownReport {
    fn render_report(&self, run: &AuditRun) -> Result<String, RepoAuditError> {
        let mut output = format!(
            "# Repository audit\n\n**Date:** {}  \n**Repositories:** {}\n\n",
            run.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
            run.len()
        );

        output.push_str("## Summary\n\n| Status | Count |\n|---|---|\n");
        for status in RuleStatus::ALL {
            let count: usize = run
                .iter()
                .map(|(_, results)| results.count_by_status(status))
                .sum();
            output.push_str(&format!("| {} | {} |\n", status, count));
        }
        output.push('\n');

        output.push_str("## Results\n\n");
        let mut rows = 0;
        let mut table = String::from("| Repository | Rule | Status | Detail |\n|---|---|---|---|\n");
        for (repo, results) in run.iter() {
            for result in &results.rules {
                if self.failures_only
                    && !matches!(result.status, RuleStatus::Failure | RuleStatus::Error)
                {
                    continue;
                }
                rows += 1;
                table.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    repo.full_name,
                    result.name,
                    result.status,
                    escape_cell(result.detail.as_deref().unwrap_or(""))
                ));
            }
        }

        if rows == 0 {
            output.push_str("No results to report.\n");
        } else {
            output.push_str(&table);
        }

        Ok(output)
    }
}
