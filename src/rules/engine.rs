//! Rules evaluation engine

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{debug, info, span, warn, Level};

use super::definition::RuleDefinition;
use super::evaluator::{evaluate, Rule};
use super::results::{RepositoryResults, RuleStatus};
use crate::audit::{AuditRun, RepositorySnapshot};
use crate::error::{RepoAuditError, RuleSetError};
use crate::stats::DISPLAY_ORDER;

/// A validated rule set, in definition order
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    digest: String,
}

impl RuleSet {
    /// Validate and compile rule definitions.
    ///
    /// Fails on the first empty name, reserved or duplicate name,
    /// type/resource mismatch, missing `match` pattern or invalid glob.
    pub fn compile(definitions: &[RuleDefinition]) -> Result<Self, RuleSetError> {
        let mut names = HashSet::new();
        let mut rules = Vec::with_capacity(definitions.len());

        for (i, definition) in definitions.iter().enumerate() {
            if definition.name.trim().is_empty() {
                return Err(RuleSetError::EmptyName { position: i + 1 });
            }
            // Rule counters share the statistics map with the built-in counters
            if DISPLAY_ORDER.contains(&definition.name.as_str()) {
                return Err(RuleSetError::ReservedName {
                    name: definition.name.clone(),
                });
            }
            if !names.insert(definition.name.as_str()) {
                return Err(RuleSetError::DuplicateName {
                    name: definition.name.clone(),
                });
            }
            rules.push(Rule::compile(definition)?);
        }

        Ok(Self {
            rules,
            digest: digest(definitions),
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// SHA-256 (hex) of the definitions this set was compiled from
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Evaluate every rule against one repository
    pub fn evaluate_all(&self, repo: &RepositorySnapshot) -> RepositoryResults {
        RepositoryResults {
            rules: self.rules.iter().map(|rule| evaluate(rule, repo)).collect(),
        }
    }
}

fn digest(definitions: &[RuleDefinition]) -> String {
    let mut hasher = Sha256::new();
    for definition in definitions {
        let fields = [
            definition.name.as_str(),
            definition.action.as_str(),
            definition.resource.as_str(),
            definition.pattern.as_deref().unwrap_or(""),
            definition.value_type.map(|t| t.as_str()).unwrap_or(""),
        ];
        // NUL-separated so adjacent fields cannot run together
        for field in fields
            .into_iter()
            .chain(definition.exclude.iter().map(String::as_str))
        {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Main audit engine
pub struct AuditEngine {
    rules: RuleSet,
}

impl AuditEngine {
    /// Create an engine from rule definitions, validating them first
    pub fn new(definitions: &[RuleDefinition]) -> Result<Self, RuleSetError> {
        Ok(Self {
            rules: RuleSet::compile(definitions)?,
        })
    }

    /// Create an engine from an already compiled rule set
    pub fn with_rule_set(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate every rule against every repository, in fetch order.
    ///
    /// A duplicate repository identity aborts the run before any result is
    /// returned. Evaluation errors for a single (repository, rule) pair are
    /// recorded as [`RuleStatus::Error`] and do not stop the run.
    pub fn run(
        &self,
        repositories: impl IntoIterator<Item = RepositorySnapshot>,
    ) -> Result<AuditRun, RuleSetError> {
        info!(rules = self.rules.len(), "Starting audit");

        let mut builder = AuditRun::builder(self.rules.digest());

        for repo in repositories {
            let span = span!(Level::DEBUG, "repository", repository = %repo.full_name);
            let _guard = span.enter();

            let results = self.rules.evaluate_all(&repo);
            for result in results.by_status(RuleStatus::Error) {
                warn!(
                    rule = %result.name,
                    detail = result.detail.as_deref().unwrap_or_default(),
                    "Rule could not be evaluated"
                );
            }
            debug!(
                failures = results.count_by_status(RuleStatus::Failure),
                "Repository evaluated"
            );

            builder.push(repo, results)?;
        }

        let run = builder.finish(Utc::now());

        let mut counts = [0usize; 4];
        for (_, results) in run.iter() {
            for (slot, status) in counts.iter_mut().zip(RuleStatus::ALL) {
                *slot += results.count_by_status(status);
            }
        }
        info!(
            "Audit complete: {} repositories, {} success, {} failure, {} not-applicable, {} error",
            run.len(),
            counts[0],
            counts[1],
            counts[2],
            counts[3],
        );

        Ok(run)
    }
}

/// Validate `definitions` and evaluate them against `repositories`.
///
/// Configuration errors are reported before any evaluation happens.
pub fn run(
    definitions: &[RuleDefinition],
    repositories: impl IntoIterator<Item = RepositorySnapshot>,
) -> Result<AuditRun, RepoAuditError> {
    let engine = AuditEngine::new(definitions)?;
    Ok(engine.run(repositories)?)
}
