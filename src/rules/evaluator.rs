//! Rule evaluator
//!
//! Applies one compiled [`Rule`] to one [`RepositorySnapshot`]. Evaluation is
//! pure: the same rule and snapshot always produce the same [`RuleResult`], and
//! no state is shared between (repository, rule) pairs.
//!
//! Order of checks:
//!
//! 1. resolve the resource on the repository
//! 2. exclusion: an exclude pattern matching the repository identity or the
//!    resolved value makes the rule not applicable
//! 3. an absent string under a pattern action is an evaluation error
//! 4. the action decides success or failure

use super::definition::{Action, Resource, RuleDefinition, ValueType};
use super::pattern::Pattern;
use super::results::RuleResult;
use crate::audit::RepositorySnapshot;
use crate::error::RuleSetError;

/// A validated rule with compiled patterns
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub action: Action,
    pub resource: Resource,
    pattern: Option<Pattern>,
    exclude: Vec<Pattern>,
}

impl Rule {
    /// Validate a single definition and compile its patterns.
    ///
    /// Name uniqueness is a rule-set property and is checked by
    /// [`super::engine::RuleSet::compile`].
    pub fn compile(definition: &RuleDefinition) -> Result<Self, RuleSetError> {
        let expected = definition.resource.value_type();
        if let Some(declared) = definition.value_type {
            if declared != expected {
                return Err(RuleSetError::TypeMismatch {
                    name: definition.name.clone(),
                    resource: definition.resource.to_string(),
                    declared: declared.to_string(),
                    expected: expected.to_string(),
                });
            }
        }

        let compile = |source: &str| {
            Pattern::new(source).map_err(|e| RuleSetError::InvalidPattern {
                name: definition.name.clone(),
                pattern: source.to_string(),
                source: e,
            })
        };

        let pattern = match (&definition.pattern, definition.action.uses_pattern()) {
            (Some(source), true) if !source.is_empty() => Some(compile(source)?),
            (_, true) => {
                return Err(RuleSetError::MissingMatch {
                    name: definition.name.clone(),
                    action: definition.action.to_string(),
                })
            }
            (_, false) => None,
        };

        let exclude = definition
            .exclude
            .iter()
            .map(|source| compile(source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: definition.name.clone(),
            action: definition.action,
            resource: definition.resource,
            pattern,
            exclude,
        })
    }

    pub fn value_type(&self) -> ValueType {
        self.resource.value_type()
    }

    /// Patterns exempting repositories from this rule
    pub fn exclude_patterns(&self) -> impl Iterator<Item = &str> {
        self.exclude.iter().map(Pattern::as_str)
    }
}

/// A resource value resolved on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceValue<'a> {
    Text(Option<&'a str>),
    Flag(bool),
    List(&'a [String]),
    Number(u64),
}

impl<'a> ResourceValue<'a> {
    /// Resolve a resource on a repository
    pub fn resolve(resource: Resource, repo: &'a RepositorySnapshot) -> Self {
        match resource {
            Resource::FullName => Self::Text(Some(&repo.full_name)),
            Resource::Name => Self::Text(Some(&repo.name)),
            Resource::Description => Self::Text(repo.description.as_deref()),
            Resource::Homepage => Self::Text(repo.homepage.as_deref()),
            Resource::Language => Self::Text(repo.language.as_deref()),
            Resource::License => Self::Text(repo.license.as_deref()),
            Resource::DefaultBranch => Self::Text(repo.default_branch.as_deref()),
            Resource::Topics => Self::List(&repo.topics),
            Resource::Private => Self::Flag(repo.private),
            Resource::Archived => Self::Flag(repo.archived),
            Resource::Disabled => Self::Flag(repo.disabled),
            Resource::Fork => Self::Flag(repo.fork),
            Resource::Stargazers => Self::Number(repo.stargazers),
            Resource::Forks => Self::Number(repo.forks),
            Resource::Watchers => Self::Number(repo.watchers),
            Resource::OpenIssues => Self::Number(repo.open_issues),
        }
    }

    /// Textual forms the patterns are tested against
    fn texts(&self) -> Vec<String> {
        match self {
            Self::Text(Some(s)) => vec![s.to_string()],
            Self::Text(None) => Vec::new(),
            Self::Flag(b) => vec![b.to_string()],
            Self::List(items) => items.to_vec(),
            Self::Number(n) => vec![n.to_string()],
        }
    }

    /// Presence as understood by `require` and `forbid`
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => s.is_some_and(|s| !s.trim().is_empty()),
            Self::Flag(b) => *b,
            Self::List(items) => !items.is_empty(),
            Self::Number(n) => *n > 0,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Text(Some(s)) if s.trim().is_empty() => "blank".to_string(),
            Self::Text(Some(s)) => format!("'{}'", s),
            Self::Text(None) => "not set".to_string(),
            Self::Flag(b) => b.to_string(),
            Self::List(items) if items.is_empty() => "empty".to_string(),
            Self::List(items) => format!("[{}]", items.join(", ")),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Evaluate one rule against one repository
pub fn evaluate(rule: &Rule, repo: &RepositorySnapshot) -> RuleResult {
    let value = ResourceValue::resolve(rule.resource, repo);
    let texts = value.texts();

    let excluded_by = rule.exclude.iter().find(|pattern| {
        pattern.is_match(&repo.full_name) || texts.iter().any(|t| pattern.is_match(t))
    });
    if let Some(pattern) = excluded_by {
        return RuleResult::not_applicable(
            &rule.name,
            format!("excluded by pattern '{}'", pattern.as_str()),
        );
    }

    match (rule.action, &rule.pattern) {
        (Action::Match | Action::ExcludeMatch, Some(pattern)) => {
            if value == ResourceValue::Text(None) {
                return RuleResult::error(
                    &rule.name,
                    format!("{} is not set on {}", rule.resource, repo.full_name),
                );
            }

            let matched = texts.iter().any(|t| pattern.is_match(t));
            let wanted = rule.action == Action::Match;
            if matched == wanted {
                RuleResult::success(&rule.name)
            } else if wanted {
                RuleResult::failure(
                    &rule.name,
                    format!(
                        "{} {} does not match '{}'",
                        rule.resource,
                        value.describe(),
                        pattern.as_str()
                    ),
                )
            } else {
                RuleResult::failure(
                    &rule.name,
                    format!(
                        "{} {} matches '{}'",
                        rule.resource,
                        value.describe(),
                        pattern.as_str()
                    ),
                )
            }
        }
        (Action::Match | Action::ExcludeMatch, None) => RuleResult::error(
            &rule.name,
            format!("action '{}' has no pattern", rule.action),
        ),
        (Action::Require, _) if value.is_present() => RuleResult::success(&rule.name),
        (Action::Require, _) => RuleResult::failure(
            &rule.name,
            format!("{} is required but is {}", rule.resource, value.describe()),
        ),
        (Action::Forbid, _) if !value.is_present() => RuleResult::success(&rule.name),
        (Action::Forbid, _) => RuleResult::failure(
            &rule.name,
            format!("{} is forbidden but is {}", rule.resource, value.describe()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleStatus;
    use chrono::{TimeZone, Utc};

    fn repo(full_name: &str) -> RepositorySnapshot {
        let updated = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RepositorySnapshot::new(full_name, updated)
    }

    fn rule(definition: RuleDefinition) -> Rule {
        Rule::compile(&definition).unwrap()
    }

    #[test]
    fn test_forbid_private() {
        let no_public = rule(
            RuleDefinition::new("no-public", Action::Forbid, Resource::Private)
                .with_type(ValueType::Bool),
        );

        let private = repo("org/a").with_private(true);
        let public = repo("org/b").with_private(false);

        let failed = evaluate(&no_public, &private);
        assert_eq!(failed.status, RuleStatus::Failure);
        assert_eq!(failed.name, "no-public");
        assert_eq!(
            failed.detail.as_deref(),
            Some("visibility.private is forbidden but is true")
        );

        assert_eq!(evaluate(&no_public, &public).status, RuleStatus::Success);
    }

    #[test]
    fn test_excluded_repository_is_not_applicable() {
        let has_license = rule(
            RuleDefinition::new("has-license", Action::Require, Resource::License)
                .with_type(ValueType::String)
                .with_exclude("org/legacy-*"),
        );

        let legacy = repo("org/legacy-tool").with_license("");
        let result = evaluate(&has_license, &legacy);
        assert_eq!(result.status, RuleStatus::NotApplicable);
        assert_eq!(
            result.detail.as_deref(),
            Some("excluded by pattern 'org/legacy-*'")
        );

        let current = repo("org/tool").with_license("");
        assert_eq!(evaluate(&has_license, &current).status, RuleStatus::Failure);
    }

    #[test]
    fn test_exclusion_wins_over_every_action() {
        let actions = [
            (Action::Match, Some("*")),
            (Action::ExcludeMatch, Some("*")),
            (Action::Require, None),
            (Action::Forbid, None),
        ];

        for (action, pattern) in actions {
            let mut definition =
                RuleDefinition::new("r", action, Resource::Description).with_exclude("org/*");
            definition.pattern = pattern.map(str::to_string);
            let compiled = rule(definition);

            let with_description = repo("org/x").with_description("anything");
            let without_description = repo("org/y");
            assert_eq!(
                evaluate(&compiled, &with_description).status,
                RuleStatus::NotApplicable
            );
            assert_eq!(
                evaluate(&compiled, &without_description).status,
                RuleStatus::NotApplicable
            );
        }
    }

    #[test]
    fn test_exclusion_matches_resolved_value() {
        let language = rule(
            RuleDefinition::new("lang", Action::Match, Resource::Language)
                .with_match("Go")
                .with_exclude("HCL"),
        );

        let hcl = repo("org/modules").with_language("HCL");
        assert_eq!(evaluate(&language, &hcl).status, RuleStatus::NotApplicable);

        let rust = repo("org/cli").with_language("Rust");
        assert_eq!(evaluate(&language, &rust).status, RuleStatus::Failure);
    }

    #[test]
    fn test_exclusion_on_list_element() {
        let topics = rule(
            RuleDefinition::new("topics", Action::Require, Resource::Topics)
                .with_exclude("deprecated"),
        );

        let deprecated = repo("org/old").with_topics(["go", "deprecated"]);
        assert_eq!(
            evaluate(&topics, &deprecated).status,
            RuleStatus::NotApplicable
        );
    }

    #[test]
    fn test_match_on_string() {
        let described = rule(
            RuleDefinition::new("desc", Action::Match, Resource::Description)
                .with_match("*[Tt]erraform*"),
        );

        let provider = repo("org/p").with_description("Terraform provider for X");
        assert_eq!(evaluate(&described, &provider).status, RuleStatus::Success);

        let other = repo("org/q").with_description("A library");
        let result = evaluate(&described, &other);
        assert_eq!(result.status, RuleStatus::Failure);
        assert_eq!(
            result.detail.as_deref(),
            Some("description 'A library' does not match '*[Tt]erraform*'")
        );
    }

    #[test]
    fn test_match_on_absent_string_is_error() {
        let described = rule(
            RuleDefinition::new("desc", Action::Match, Resource::Description).with_match("*"),
        );

        let result = evaluate(&described, &repo("org/a"));
        assert_eq!(result.status, RuleStatus::Error);
        assert_eq!(
            result.detail.as_deref(),
            Some("description is not set on org/a")
        );
    }

    #[test]
    fn test_exclude_match_on_string() {
        let no_wip = rule(
            RuleDefinition::new("no-wip", Action::ExcludeMatch, Resource::Description)
                .with_match("WIP*"),
        );

        let wip = repo("org/a").with_description("WIP do not use");
        let result = evaluate(&no_wip, &wip);
        assert_eq!(result.status, RuleStatus::Failure);
        assert_eq!(
            result.detail.as_deref(),
            Some("description 'WIP do not use' matches 'WIP*'")
        );

        let done = repo("org/b").with_description("Stable");
        assert_eq!(evaluate(&no_wip, &done).status, RuleStatus::Success);
    }

    #[test]
    fn test_match_on_list_any_element() {
        let tagged = rule(
            RuleDefinition::new("team-topic", Action::Match, Resource::Topics)
                .with_match("team-*"),
        );

        let owned = repo("org/a").with_topics(["go", "team-core"]);
        assert_eq!(evaluate(&tagged, &owned).status, RuleStatus::Success);

        let unowned = repo("org/b").with_topics(["go"]);
        assert_eq!(evaluate(&tagged, &unowned).status, RuleStatus::Failure);

        let empty = repo("org/c");
        assert_eq!(evaluate(&tagged, &empty).status, RuleStatus::Failure);
    }

    #[test]
    fn test_exclude_match_on_list_every_element() {
        let no_internal = rule(
            RuleDefinition::new("no-internal", Action::ExcludeMatch, Resource::Topics)
                .with_match("internal*"),
        );

        let clean = repo("org/a").with_topics(["go", "cli"]);
        assert_eq!(evaluate(&no_internal, &clean).status, RuleStatus::Success);

        let leaky = repo("org/b").with_topics(["go", "internal-only"]);
        assert_eq!(evaluate(&no_internal, &leaky).status, RuleStatus::Failure);
    }

    #[test]
    fn test_match_on_bool_and_number() {
        let archived = rule(
            RuleDefinition::new("is-archived", Action::Match, Resource::Archived).with_match("true"),
        );
        let repo_archived = repo("org/a").with_archived(true);
        assert_eq!(
            evaluate(&archived, &repo_archived).status,
            RuleStatus::Success
        );

        let no_stars = rule(
            RuleDefinition::new("unstarred", Action::Match, Resource::Stargazers).with_match("0"),
        );
        let starred = repo("org/b").with_counts(12, 0, 0);
        assert_eq!(evaluate(&no_stars, &starred).status, RuleStatus::Failure);
    }

    #[test]
    fn test_require_uses_presence() {
        let has_license = rule(RuleDefinition::new(
            "has-license",
            Action::Require,
            Resource::License,
        ));

        assert_eq!(
            evaluate(&has_license, &repo("org/a").with_license("MIT")).status,
            RuleStatus::Success
        );

        let blank = evaluate(&has_license, &repo("org/b").with_license("  "));
        assert_eq!(blank.status, RuleStatus::Failure);
        assert_eq!(
            blank.detail.as_deref(),
            Some("license is required but is blank")
        );

        let unset = evaluate(&has_license, &repo("org/c"));
        assert_eq!(unset.status, RuleStatus::Failure);
        assert_eq!(
            unset.detail.as_deref(),
            Some("license is required but is not set")
        );
    }

    #[test]
    fn test_require_and_forbid_on_numbers_and_lists() {
        let has_topics = rule(RuleDefinition::new("t", Action::Require, Resource::Topics));
        assert_eq!(
            evaluate(&has_topics, &repo("org/a")).status,
            RuleStatus::Failure
        );

        let no_issues = rule(RuleDefinition::new("i", Action::Forbid, Resource::OpenIssues));
        let mut busy = repo("org/b");
        busy.open_issues = 4;
        let result = evaluate(&no_issues, &busy);
        assert_eq!(result.status, RuleStatus::Failure);
        assert_eq!(
            result.detail.as_deref(),
            Some("open_issues is forbidden but is 4")
        );
        assert_eq!(
            evaluate(&no_issues, &repo("org/c")).status,
            RuleStatus::Success
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let r = rule(
            RuleDefinition::new("desc", Action::Match, Resource::Description).with_match("*cli*"),
        );
        let snapshot = repo("org/a").with_description("a cli");

        assert_eq!(evaluate(&r, &snapshot), evaluate(&r, &snapshot));
    }

    #[test]
    fn test_compile_rejects_type_mismatch() {
        let definition = RuleDefinition::new("bad", Action::Forbid, Resource::Private)
            .with_type(ValueType::String);

        let err = Rule::compile(&definition).unwrap_err();
        assert!(matches!(err, RuleSetError::TypeMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "rule 'bad': type 'string' is incompatible with resource 'visibility.private' (bool)"
        );
    }

    #[test]
    fn test_compile_requires_match_for_pattern_actions() {
        let missing = RuleDefinition::new("m", Action::Match, Resource::Description);
        assert!(matches!(
            Rule::compile(&missing),
            Err(RuleSetError::MissingMatch { .. })
        ));

        let empty = RuleDefinition::new("m", Action::ExcludeMatch, Resource::Description)
            .with_match("");
        assert!(matches!(
            Rule::compile(&empty),
            Err(RuleSetError::MissingMatch { .. })
        ));

        // require/forbid ignore the pattern entirely
        let ignored =
            RuleDefinition::new("r", Action::Require, Resource::License).with_match("[bad");
        assert!(Rule::compile(&ignored).is_ok());
    }

    #[test]
    fn test_compile_rejects_invalid_exclude() {
        let definition =
            RuleDefinition::new("x", Action::Require, Resource::License).with_exclude("[oops");

        let err = Rule::compile(&definition).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidPattern { ref pattern, .. } if pattern == "[oops"));
    }
}
