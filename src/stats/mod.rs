//! Statistics aggregation
//!
//! Turns a completed [`AuditRun`] into named counters: blank attributes,
//! visibility flags, star/fork/watcher totals, recency buckets and per-rule
//! success counts.
//!
//! The aggregator returns raw counts. Percentages are derived by the caller
//! with [`percentage`], which refuses to divide by a zero total.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::audit::AuditRun;
use crate::rules::RuleStatus;

pub const TOTAL: &str = "TOTAL";
pub const BLANK_DESCRIPTION: &str = "blank_description";
pub const BLANK_LANGUAGE: &str = "blank_language";
pub const BLANK_TOPICS: &str = "blank_topics";
pub const BLANK_LICENSE: &str = "blank_license";
pub const PRIVATE: &str = "private";
pub const ARCHIVED: &str = "archived";
pub const DISABLED: &str = "disabled";
pub const TOTAL_STARS: &str = "total_stars";
pub const TOTAL_FORKS: &str = "total_forks";
pub const TOTAL_WATCHERS: &str = "total_watchers";
pub const UPDATED_0_30_DAYS: &str = "updated_0-30_days";
pub const UPDATED_31_60_DAYS: &str = "updated_31-60_days";
pub const UPDATED_61_90_DAYS: &str = "updated_61-90_days";
pub const UPDATED_91_365_DAYS: &str = "updated_91-365_days";
pub const UPDATED_OVER_365_DAYS: &str = "updated_>_365_days";

/// Built-in counters in display order. Rule counters follow, sorted by name.
pub const DISPLAY_ORDER: [&str; 16] = [
    TOTAL,
    TOTAL_STARS,
    TOTAL_FORKS,
    TOTAL_WATCHERS,
    BLANK_DESCRIPTION,
    BLANK_LANGUAGE,
    BLANK_TOPICS,
    PRIVATE,
    ARCHIVED,
    DISABLED,
    BLANK_LICENSE,
    UPDATED_0_30_DAYS,
    UPDATED_31_60_DAYS,
    UPDATED_61_90_DAYS,
    UPDATED_91_365_DAYS,
    UPDATED_OVER_365_DAYS,
];

/// Counters that are sums rather than repository counts
pub const SUM_COUNTERS: [&str; 3] = [TOTAL_STARS, TOTAL_FORKS, TOTAL_WATCHERS];

/// Upper bounds (inclusive, in hours) of the recency buckets, lowest first.
/// Anything above the last bound falls in [`UPDATED_OVER_365_DAYS`].
const RECENCY_BUCKETS: [(i64, &str); 4] = [
    (30 * 24, UPDATED_0_30_DAYS),
    (60 * 24, UPDATED_31_60_DAYS),
    (90 * 24, UPDATED_61_90_DAYS),
    (365 * 24, UPDATED_91_365_DAYS),
];

/// Aggregated counters for one audit run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Stats {
    counters: BTreeMap<String, u64>,
}

impl Stats {
    /// Value of a counter; unknown names read as zero
    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counters.contains_key(name)
    }

    /// Number of repositories in the run
    pub fn total(&self) -> u64 {
        self.get(TOTAL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names of the per-rule counters, sorted
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.counters
            .keys()
            .map(String::as_str)
            .filter(|name| !DISPLAY_ORDER.contains(name))
    }

    pub fn into_map(self) -> BTreeMap<String, u64> {
        self.counters
    }
}

/// `count / total * 100`, or `None` when `total` is zero
pub fn percentage(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(count as f64 / total as f64 * 100.0)
}

/// Recency bucket for a repository last updated `hours` ago
pub fn recency_bucket(hours: i64) -> &'static str {
    RECENCY_BUCKETS
        .iter()
        .find(|(bound, _)| hours <= *bound)
        .map(|(_, name)| *name)
        .unwrap_or(UPDATED_OVER_365_DAYS)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Aggregate a run relative to the current time
pub fn aggregate(run: &AuditRun) -> Stats {
    aggregate_at(run, Utc::now())
}

/// Aggregate a run relative to `now`
pub fn aggregate_at(run: &AuditRun, now: DateTime<Utc>) -> Stats {
    let mut counters: BTreeMap<String, u64> = DISPLAY_ORDER
        .iter()
        .map(|name| (name.to_string(), 0))
        .collect();
    for rule in run.rule_names() {
        counters.entry(rule.to_string()).or_insert(0);
    }
    counters.insert(TOTAL.to_string(), run.len() as u64);

    let mut bump = |name: &str, by: u64| {
        if let Some(counter) = counters.get_mut(name) {
            *counter += by;
        }
    };

    for (repo, results) in run.iter() {
        if is_blank(repo.description.as_deref()) {
            bump(BLANK_DESCRIPTION, 1);
        }
        if is_blank(repo.language.as_deref()) {
            bump(BLANK_LANGUAGE, 1);
        }
        if repo.topics.is_empty() {
            bump(BLANK_TOPICS, 1);
        }
        if is_blank(repo.license.as_deref()) {
            bump(BLANK_LICENSE, 1);
        }
        if repo.private {
            bump(PRIVATE, 1);
        }
        if repo.archived {
            bump(ARCHIVED, 1);
        }
        if repo.disabled {
            bump(DISABLED, 1);
        }

        bump(TOTAL_STARS, repo.stargazers);
        bump(TOTAL_FORKS, repo.forks);
        bump(TOTAL_WATCHERS, repo.watchers);

        // Whole hours, truncated; future timestamps count as zero
        let hours = (now - repo.updated).num_hours().max(0);
        bump(recency_bucket(hours), 1);

        for result in results.by_status(RuleStatus::Success) {
            bump(&result.name, 1);
        }
    }

    Stats { counters }
}
