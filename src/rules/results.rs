//! # Rule Result Structures
//!
//! This module defines the outcome of evaluating one rule against one
//! repository.
//!
//! ## Overview
//!
//! - [`RuleStatus`] - Outcome kind (success, failure, not-applicable, error)
//! - [`RuleResult`] - Outcome of one rule for one repository, with detail
//! - [`RepositoryResults`] - All rule outcomes for one repository
//!
//! ## Examples
//!
//! ```rust
//! use repoaudit::rules::{RepositoryResults, RuleResult, RuleStatus};
//!
//! let mut results = RepositoryResults::default();
//! results.push(RuleResult::success("has-license"));
//! results.push(RuleResult::failure("no-public", "visibility.private is true"));
//!
//! assert_eq!(results.count_by_status(RuleStatus::Success), 1);
//! assert_eq!(results.get("no-public").unwrap().status, RuleStatus::Failure);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of evaluating a rule against a repository.
///
/// - **Success** - the repository satisfies the rule
/// - **Failure** - the repository violates the rule
/// - **NotApplicable** - the repository is exempted by an exclude pattern;
///   it counts toward neither passes nor failures
/// - **Error** - the rule could not be evaluated for this repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleStatus {
    Success,
    Failure,
    NotApplicable,
    Error,
}

impl RuleStatus {
    /// All statuses, in report order
    pub const ALL: [RuleStatus; 4] = [
        RuleStatus::Success,
        RuleStatus::Failure,
        RuleStatus::NotApplicable,
        RuleStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::NotApplicable => "not-applicable",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one rule for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Name of the rule that produced this result
    pub name: String,

    pub status: RuleStatus,

    /// Human-readable explanation (failure reason, exclusion, error cause)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RuleResult {
    /// Create a result with no detail
    pub fn new(name: impl Into<String>, status: RuleStatus) -> Self {
        Self {
            name: name.into(),
            status,
            detail: None,
        }
    }

    pub fn success(name: impl Into<String>) -> Self {
        Self::new(name, RuleStatus::Success)
    }

    pub fn failure(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, RuleStatus::Failure).with_detail(detail)
    }

    pub fn not_applicable(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, RuleStatus::NotApplicable).with_detail(detail)
    }

    pub fn error(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, RuleStatus::Error).with_detail(detail)
    }

    /// Set the detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// All rule results recorded for one repository, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryResults {
    pub rules: Vec<RuleResult>,
}

impl RepositoryResults {
    /// Append a result
    pub fn push(&mut self, result: RuleResult) {
        self.rules.push(result);
    }

    /// Find the result for a rule
    pub fn get(&self, rule_name: &str) -> Option<&RuleResult> {
        self.rules.iter().find(|r| r.name == rule_name)
    }

    /// Results with the given status
    pub fn by_status(&self, status: RuleStatus) -> impl Iterator<Item = &RuleResult> {
        self.rules.iter().filter(move |r| r.status == status)
    }

    /// Count results with the given status
    pub fn count_by_status(&self, status: RuleStatus) -> usize {
        self.by_status(status).count()
    }

    /// Name of the first rule that appears more than once, if any
    pub fn duplicate_rule(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rules
            .iter()
            .find(|r| !seen.insert(r.name.as_str()))
            .map(|r| r.name.as_str())
    }
}
