//! Audit runs
//!
//! An [`AuditRun`] is the complete output of one audit: the repository
//! snapshots, the order they were fetched in, and the rule results for each.
//! Runs are built once by the engine through [`AuditRunBuilder`] and never
//! mutated afterwards. Runs read back from storage are re-validated.

pub mod snapshot;

pub use snapshot::RepositorySnapshot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::RuleSetError;
use crate::rules::results::RepositoryResults;

/// The structural invariants of an audit run were violated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inconsistent audit run: {0}")]
pub struct InconsistentRun(String);

/// One complete evaluation pass over a repository set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAuditRun")]
pub struct AuditRun {
    created_at: DateTime<Utc>,
    rules_digest: String,
    index: Vec<String>,
    repos: BTreeMap<String, RepositorySnapshot>,
    results: BTreeMap<String, RepositoryResults>,
}

/// Unvalidated shape of a serialized run
#[derive(Deserialize)]
struct RawAuditRun {
    created_at: DateTime<Utc>,
    #[serde(default)]
    rules_digest: String,
    index: Vec<String>,
    repos: BTreeMap<String, RepositorySnapshot>,
    results: BTreeMap<String, RepositoryResults>,
}

impl TryFrom<RawAuditRun> for AuditRun {
    type Error = InconsistentRun;

    fn try_from(raw: RawAuditRun) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for id in &raw.index {
            if !seen.insert(id.as_str()) {
                return Err(InconsistentRun(format!("'{}' is indexed twice", id)));
            }
            let repo = raw
                .repos
                .get(id)
                .ok_or_else(|| InconsistentRun(format!("'{}' has no snapshot", id)))?;
            if repo.full_name != *id {
                return Err(InconsistentRun(format!(
                    "snapshot under '{}' is for '{}'",
                    id, repo.full_name
                )));
            }
            let results = raw
                .results
                .get(id)
                .ok_or_else(|| InconsistentRun(format!("'{}' has no results", id)))?;
            if let Some(rule) = results.duplicate_rule() {
                return Err(InconsistentRun(format!(
                    "'{}' has more than one result for rule '{}'",
                    id, rule
                )));
            }
        }

        if let Some(stray) = raw
            .repos
            .keys()
            .chain(raw.results.keys())
            .find(|id| !seen.contains(id.as_str()))
        {
            return Err(InconsistentRun(format!("'{}' is not indexed", stray)));
        }

        Ok(Self {
            created_at: raw.created_at,
            rules_digest: raw.rules_digest,
            index: raw.index,
            repos: raw.repos,
            results: raw.results,
        })
    }
}

impl AuditRun {
    /// Start building a run for the rule set with the given digest
    pub fn builder(rules_digest: impl Into<String>) -> AuditRunBuilder {
        AuditRunBuilder {
            rules_digest: rules_digest.into(),
            index: Vec::new(),
            repos: BTreeMap::new(),
            results: BTreeMap::new(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// SHA-256 of the rule definitions that produced this run
    pub fn rules_digest(&self) -> &str {
        &self.rules_digest
    }

    /// Repository identities in fetch order
    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn repository(&self, full_name: &str) -> Option<&RepositorySnapshot> {
        self.repos.get(full_name)
    }

    pub fn results_for(&self, full_name: &str) -> Option<&RepositoryResults> {
        self.results.get(full_name)
    }

    /// Snapshots and results in fetch order
    pub fn iter(&self) -> impl Iterator<Item = (&RepositorySnapshot, &RepositoryResults)> {
        self.index
            .iter()
            .filter_map(|id| Some((self.repos.get(id)?, self.results.get(id)?)))
    }

    /// Every rule name with at least one result, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .results
            .values()
            .flat_map(|r| r.rules.iter().map(|rule| rule.name.as_str()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort_unstable();
        names
    }
}

/// Accumulates repositories in fetch order and produces an [`AuditRun`]
#[derive(Debug)]
pub struct AuditRunBuilder {
    rules_digest: String,
    index: Vec<String>,
    repos: BTreeMap<String, RepositorySnapshot>,
    results: BTreeMap<String, RepositoryResults>,
}

impl AuditRunBuilder {
    /// Append a repository and its results
    pub fn push(
        &mut self,
        repo: RepositorySnapshot,
        results: RepositoryResults,
    ) -> Result<(), RuleSetError> {
        let id = repo.full_name.clone();
        if self.repos.contains_key(&id) {
            return Err(RuleSetError::DuplicateRepository { full_name: id });
        }

        self.index.push(id.clone());
        self.results.insert(id.clone(), results);
        self.repos.insert(id, repo);
        Ok(())
    }

    pub fn finish(self, created_at: DateTime<Utc>) -> AuditRun {
        AuditRun {
            created_at,
            rules_digest: self.rules_digest,
            index: self.index,
            repos: self.repos,
            results: self.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleResult;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn results(entries: &[RuleResult]) -> RepositoryResults {
        RepositoryResults {
            rules: entries.to_vec(),
        }
    }

    fn sample_run() -> AuditRun {
        let mut builder = AuditRun::builder("abc123");
        builder
            .push(
                RepositorySnapshot::new("org/zeta", at()),
                results(&[RuleResult::success("has-license")]),
            )
            .unwrap();
        builder
            .push(
                RepositorySnapshot::new("org/alpha", at()),
                results(&[
                    RuleResult::failure("has-license", "blank"),
                    RuleResult::success("no-public"),
                ]),
            )
            .unwrap();
        builder.finish(at())
    }

    #[test]
    fn test_builder_preserves_fetch_order() {
        let run = sample_run();
        assert_eq!(run.index(), &["org/zeta".to_string(), "org/alpha".to_string()]);

        let order: Vec<&str> = run.iter().map(|(repo, _)| repo.full_name.as_str()).collect();
        assert_eq!(order, vec!["org/zeta", "org/alpha"]);
        assert_eq!(run.len(), 2);
    }

    #[test]
    fn test_builder_rejects_duplicate_repository() {
        let mut builder = AuditRun::builder("");
        builder
            .push(RepositorySnapshot::new("org/a", at()), RepositoryResults::default())
            .unwrap();
        let err = builder
            .push(RepositorySnapshot::new("org/a", at()), RepositoryResults::default())
            .unwrap_err();

        assert!(matches!(err, RuleSetError::DuplicateRepository { ref full_name } if full_name == "org/a"));
    }

    #[test]
    fn test_rule_names_sorted_and_unique() {
        let run = sample_run();
        assert_eq!(run.rule_names(), vec!["has-license", "no-public"]);
    }

    #[test]
    fn test_json_roundtrip_keeps_index_order() {
        let run = sample_run();
        let json = serde_json::to_string(&run).unwrap();
        let loaded: AuditRun = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, run);
        assert_eq!(loaded.index()[0], "org/zeta");
    }

    #[test]
    fn test_deserialize_rejects_missing_results() {
        let json = r#"{
            "created_at": "2024-06-01T00:00:00Z",
            "rules_digest": "",
            "index": ["org/a"],
            "repos": {"org/a": {"full_name": "org/a", "name": "a", "updated": "2024-06-01T00:00:00Z"}},
            "results": {}
        }"#;

        let err = serde_json::from_str::<AuditRun>(json).unwrap_err();
        assert!(err.to_string().contains("'org/a' has no results"));
    }

    #[test]
    fn test_deserialize_rejects_unindexed_repository() {
        let json = r#"{
            "created_at": "2024-06-01T00:00:00Z",
            "index": [],
            "repos": {"org/a": {"full_name": "org/a", "name": "a", "updated": "2024-06-01T00:00:00Z"}},
            "results": {}
        }"#;

        let err = serde_json::from_str::<AuditRun>(json).unwrap_err();
        assert!(err.to_string().contains("'org/a' is not indexed"));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_rule_results() {
        let json = r#"{
            "created_at": "2024-06-01T00:00:00Z",
            "index": ["org/a"],
            "repos": {"org/a": {"full_name": "org/a", "name": "a", "updated": "2024-06-01T00:00:00Z"}},
            "results": {"org/a": {"rules": [
                {"name": "x", "status": "success"},
                {"name": "x", "status": "failure"}
            ]}}
        }"#;

        let err = serde_json::from_str::<AuditRun>(json).unwrap_err();
        assert!(err.to_string().contains("more than one result for rule 'x'"));
    }
}
