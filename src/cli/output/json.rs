//! JSON output formatting

use serde::Serialize;

use super::{display_order, ReportRenderer, StatsRenderer};
use crate::audit::AuditRun;
use crate::error::{RepoAuditError, StateError};
use crate::rules::{RuleResult, RuleStatus};
use crate::stats::{percentage, Stats, SUM_COUNTERS, TOTAL};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    version: &'static str,
    total: u64,
    counters: Vec<CounterEntry<'a>>,
}

#[derive(Serialize)]
struct CounterEntry<'a> {
    name: &'a str,
    count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    percentage: Option<f64>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    version: &'static str,
    created_at: String,
    rules_digest: &'a str,
    summary: StatusSummary,
    repositories: Vec<RepositoryEntry<'a>>,
}

#[derive(Serialize, Default)]
struct StatusSummary {
    success: usize,
    failure: usize,
    not_applicable: usize,
    error: usize,
}

#[derive(Serialize)]
struct RepositoryEntry<'a> {
    full_name: &'a str,
    results: &'a [RuleResult],
}

impl StatsRenderer for JsonOutput {
    fn render_stats(&self, stats: &Stats) -> Result<String, RepoAuditError> {
        let total = stats.total();
        let counters = display_order(stats)
            .into_iter()
            .map(|name| {
                let count = stats.get(name);
                let percentage = if name == TOTAL || SUM_COUNTERS.contains(&name) {
                    None
                } else {
                    percentage(count, total)
                };
                CounterEntry {
                    name,
                    count,
                    percentage,
                }
            })
            .collect();

        let output = StatsOutput {
            version: env!("CARGO_PKG_VERSION"),
            total,
            counters,
        };

        serde_json::to_string_pretty(&output).map_err(|e| StateError::Encode(e).into())
    }
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, run: &AuditRun) -> Result<String, RepoAuditError> {
        let mut summary = StatusSummary::default();
        let repositories = run
            .iter()
            .map(|(repo, results)| {
                summary.success += results.count_by_status(RuleStatus::Success);
                summary.failure += results.count_by_status(RuleStatus::Failure);
                summary.not_applicable += results.count_by_status(RuleStatus::NotApplicable);
                summary.error += results.count_by_status(RuleStatus::Error);
                RepositoryEntry {
                    full_name: &repo.full_name,
                    results: &results.rules,
                }
            })
            .collect();

        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            created_at: run.created_at().to_rfc3339(),
            rules_digest: run.rules_digest(),
            summary,
            repositories,
        };

        serde_json::to_string_pretty(&output).map_err(|e| StateError::Encode(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RepositorySnapshot;
    use crate::rules::RepositoryResults;
    use crate::stats::aggregate_at;
    use chrono::Utc;

    #[test]
    fn test_stats_json_keeps_display_order() {
        let mut builder = AuditRun::builder("");
        for i in 0..4u64 {
            let results = if i < 2 {
                vec![RuleResult::success("has-license")]
            } else {
                vec![RuleResult::failure("has-license", "license is not set")]
            };
            builder
                .push(
                    RepositorySnapshot::new(format!("org/r{}", i), Utc::now())
                        .with_private(i == 0)
                        .with_counts(3, 0, 0),
                    RepositoryResults { rules: results },
                )
                .unwrap();
        }
        let stats = aggregate_at(&builder.finish(Utc::now()), Utc::now());

        let json = JsonOutput::new().render_stats(&stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total"], 4);
        let counters = value["counters"].as_array().unwrap();
        assert_eq!(counters[0]["name"], "TOTAL");
        assert!(counters[0].get("percentage").is_none());

        let private = counters.iter().find(|c| c["name"] == "private").unwrap();
        assert_eq!(private["percentage"], 25.0);

        let stars = counters.iter().find(|c| c["name"] == "total_stars").unwrap();
        assert!(stars.get("percentage").is_none());
        assert_eq!(stars["count"], 12);

        let rule = counters.last().unwrap();
        assert_eq!(rule["name"], "has-license");
        assert_eq!(rule["count"], 2);
        assert_eq!(rule["percentage"], 50.0);
    }

    #[test]
    fn test_report_json_summary() {
        let mut builder = AuditRun::builder("abc");
        builder
            .push(
                RepositorySnapshot::new("org/a", Utc::now()),
                RepositoryResults {
                    rules: vec![
                        RuleResult::success("has-license"),
                        RuleResult::error("has-homepage", "homepage is not set on org/a"),
                    ],
                },
            )
            .unwrap();
        let run = builder.finish(Utc::now());

        let json = JsonOutput::new().render_report(&run).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rules_digest"], "abc");
        assert_eq!(value["summary"]["success"], 1);
        assert_eq!(value["summary"]["error"], 1);
        assert_eq!(value["repositories"][0]["full_name"], "org/a");
        assert_eq!(value["repositories"][0]["results"][1]["status"], "error");
    }
}
