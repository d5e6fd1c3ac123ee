//! Compare module - Compare two audit runs
//!
//! This module compares a base [`AuditRun`] with a newer head run and produces
//! a [`CompareReport`] listing rule status changes per repository, repositories
//! that appeared or disappeared, and per-rule success count changes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::audit::AuditRun;
use crate::rules::RuleStatus;

/// A rule whose status changed for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub repository: String,
    pub rule: String,
    pub before: RuleStatus,
    pub after: RuleStatus,
}

impl StatusChange {
    /// A success that turned into a failure or an error
    pub fn is_regression(&self) -> bool {
        self.before == RuleStatus::Success
            && matches!(self.after, RuleStatus::Failure | RuleStatus::Error)
    }

    /// A failure or error that turned into a success
    pub fn is_fix(&self) -> bool {
        self.after == RuleStatus::Success
            && matches!(self.before, RuleStatus::Failure | RuleStatus::Error)
    }
}

/// Success counts for one rule in both runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDiff {
    pub rule: String,
    pub base_success: usize,
    pub head_success: usize,
    /// head - base, negative means fewer repositories pass
    pub diff: i64,
}

/// The result of comparing two audit runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareReport {
    pub base_ref: String,
    pub head_ref: String,
    /// Whether both runs were produced by the same rule definitions
    pub same_rules: bool,
    /// Repositories only present in the head run, in head order
    pub added_repositories: Vec<String>,
    /// Repositories only present in the base run, in base order
    pub removed_repositories: Vec<String>,
    /// Status changes for repositories present in both runs
    pub changes: Vec<StatusChange>,
    pub rule_diffs: Vec<RuleDiff>,
}

impl CompareReport {
    pub fn regressions(&self) -> impl Iterator<Item = &StatusChange> {
        self.changes.iter().filter(|c| c.is_regression())
    }

    pub fn fixes(&self) -> impl Iterator<Item = &StatusChange> {
        self.changes.iter().filter(|c| c.is_fix())
    }

    pub fn has_regressions(&self) -> bool {
        self.regressions().next().is_some()
    }
}

fn success_counts(run: &AuditRun) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (_, results) in run.iter() {
        for result in &results.rules {
            let count = counts.entry(result.name.clone()).or_insert(0);
            if result.status == RuleStatus::Success {
                *count += 1;
            }
        }
    }
    counts
}

/// Compare two runs. Repositories are matched by identity and rules by name.
pub fn compare_runs(
    base: &AuditRun,
    head: &AuditRun,
    base_ref: &str,
    head_ref: &str,
) -> CompareReport {
    let base_ids: HashSet<&str> = base.index().iter().map(String::as_str).collect();
    let head_ids: HashSet<&str> = head.index().iter().map(String::as_str).collect();

    let added_repositories = head
        .index()
        .iter()
        .filter(|id| !base_ids.contains(id.as_str()))
        .cloned()
        .collect();
    let removed_repositories = base
        .index()
        .iter()
        .filter(|id| !head_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let mut changes = Vec::new();
    for id in head.index() {
        let (Some(before), Some(after)) = (base.results_for(id), head.results_for(id)) else {
            continue;
        };
        for result in &after.rules {
            if let Some(previous) = before.get(&result.name) {
                if previous.status != result.status {
                    changes.push(StatusChange {
                        repository: id.clone(),
                        rule: result.name.clone(),
                        before: previous.status,
                        after: result.status,
                    });
                }
            }
        }
    }

    let base_counts = success_counts(base);
    let head_counts = success_counts(head);
    let rules: std::collections::BTreeSet<&String> =
        base_counts.keys().chain(head_counts.keys()).collect();
    let rule_diffs = rules
        .into_iter()
        .map(|rule| {
            let base_success = base_counts.get(rule).copied().unwrap_or(0);
            let head_success = head_counts.get(rule).copied().unwrap_or(0);
            RuleDiff {
                rule: rule.clone(),
                base_success,
                head_success,
                diff: head_success as i64 - base_success as i64,
            }
        })
        .collect();

    CompareReport {
        base_ref: base_ref.to_string(),
        head_ref: head_ref.to_string(),
        same_rules: base.rules_digest() == head.rules_digest(),
        added_repositories,
        removed_repositories,
        changes,
        rule_diffs,
    }
}

/// Format a compare report for the terminal
pub fn format_terminal(report: &CompareReport) -> String {
    use colored::Colorize;

    let mut output = format!(
        "\n{} {} {} {}\n",
        "Comparing".bold(),
        report.base_ref.cyan(),
        "->".dimmed(),
        report.head_ref.cyan()
    );

    if !report.same_rules {
        output.push_str(&format!(
            "{}\n",
            "Note: the runs were produced by different rule sets".yellow()
        ));
    }

    output.push_str(&format!("\n{}\n", "━".repeat(50).dimmed()));

    let regressions: Vec<_> = report.regressions().collect();
    output.push_str(&format!(
        "{} ({})\n",
        "Regressions".red().bold(),
        regressions.len()
    ));
    for change in &regressions {
        output.push_str(&format!(
            "  {} {} [{}] {} -> {}\n",
            "-".red(),
            change.repository,
            change.rule.cyan(),
            change.before,
            change.after
        ));
    }

    let fixes: Vec<_> = report.fixes().collect();
    output.push_str(&format!("{} ({})\n", "Fixed".green().bold(), fixes.len()));
    for change in &fixes {
        output.push_str(&format!(
            "  {} {} [{}] {} -> {}\n",
            "+".green(),
            change.repository,
            change.rule.cyan(),
            change.before,
            change.after
        ));
    }

    if !report.added_repositories.is_empty() || !report.removed_repositories.is_empty() {
        output.push_str(&format!("\n{}\n", "Repositories".bold()));
        for id in &report.added_repositories {
            output.push_str(&format!("  {} {}\n", "+".green(), id));
        }
        for id in &report.removed_repositories {
            output.push_str(&format!("  {} {}\n", "-".red(), id));
        }
    }

    if !report.rule_diffs.is_empty() {
        output.push_str(&format!("\n{}\n", "Passing repositories per rule".bold()));
        for diff in &report.rule_diffs {
            let delta = match diff.diff {
                d if d > 0 => format!("+{}", d).green().to_string(),
                d if d < 0 => d.to_string().red().to_string(),
                _ => "0".dimmed().to_string(),
            };
            output.push_str(&format!(
                "  {:<30} {:>6} -> {:<6} ({})\n",
                diff.rule, diff.base_success, diff.head_success, delta
            ));
        }
    }

    output
}

/// Format a compare report as JSON
pub fn format_json(report: &CompareReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Format a compare report as Markdown
pub fn format_markdown(report: &CompareReport) -> String {
    let mut output = format!(
        "# Audit comparison\n\n**Base:** {}  \n**Head:** {}\n\n",
        report.base_ref, report.head_ref
    );

    if !report.same_rules {
        output.push_str("> The runs were produced by different rule sets.\n\n");
    }

    output.push_str("## Status changes\n\n");
    if report.changes.is_empty() {
        output.push_str("No status changes.\n\n");
    } else {
        output.push_str("| Repository | Rule | Before | After |\n|---|---|---|---|\n");
        for change in &report.changes {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                change.repository, change.rule, change.before, change.after
            ));
        }
        output.push('\n');
    }

    output.push_str("## Rules\n\n| Rule | Base | Head | Diff |\n|---|---|---|---|\n");
    for diff in &report.rule_diffs {
        output.push_str(&format!(
            "| {} | {} | {} | {:+} |\n",
            diff.rule, diff.base_success, diff.head_success, diff.diff
        ));
    }

    output
}
