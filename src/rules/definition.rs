//! Rule definitions
//!
//! Rules are declared in a YAML file as a sequence of mappings:
//!
//! ```yaml
//! - name: no-public
//!   action: forbid
//!   resource: visibility.private
//!   type: bool
//!
//! - name: has-license
//!   action: require
//!   resource: license
//!   exclude:
//!     - "org/legacy-*"
//! ```
//!
//! `action`, `resource` and `type` are closed enums: unknown values are rejected
//! while parsing. Rule-set level checks (unique names, type compatibility, valid
//! patterns) happen when the rule set is compiled by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, RepoAuditError};

/// What a rule does with the resolved resource value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Succeeds when the `match` pattern matches the value
    Match,
    /// Succeeds when the `match` pattern does not match the value
    ExcludeMatch,
    /// Succeeds when the value is present (true, non-blank, non-empty, non-zero)
    Require,
    /// Succeeds when the value is absent (false, blank, empty, zero)
    Forbid,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::ExcludeMatch => "exclude-match",
            Self::Require => "require",
            Self::Forbid => "forbid",
        }
    }

    /// Whether the action tests the `match` pattern
    pub fn uses_pattern(&self) -> bool {
        matches!(self, Self::Match | Self::ExcludeMatch)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a resource value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "list-of-string", alias = "strings")]
    List,
    #[serde(alias = "numeric", alias = "int")]
    Number,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository attribute inspected by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    #[serde(rename = "full_name", alias = "name.full")]
    FullName,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "homepage")]
    Homepage,
    #[serde(rename = "language")]
    Language,
    #[serde(rename = "license")]
    License,
    #[serde(rename = "default_branch")]
    DefaultBranch,
    #[serde(rename = "topics")]
    Topics,
    #[serde(rename = "visibility.private", alias = "private")]
    Private,
    #[serde(rename = "visibility.archived", alias = "archived")]
    Archived,
    #[serde(rename = "visibility.disabled", alias = "disabled")]
    Disabled,
    #[serde(rename = "visibility.fork", alias = "fork")]
    Fork,
    #[serde(rename = "stargazers", alias = "stars")]
    Stargazers,
    #[serde(rename = "forks")]
    Forks,
    #[serde(rename = "watchers")]
    Watchers,
    #[serde(rename = "open_issues")]
    OpenIssues,
}

impl Resource {
    /// Canonical resource name as written in rule files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Name => "name",
            Self::Description => "description",
            Self::Homepage => "homepage",
            Self::Language => "language",
            Self::License => "license",
            Self::DefaultBranch => "default_branch",
            Self::Topics => "topics",
            Self::Private => "visibility.private",
            Self::Archived => "visibility.archived",
            Self::Disabled => "visibility.disabled",
            Self::Fork => "visibility.fork",
            Self::Stargazers => "stargazers",
            Self::Forks => "forks",
            Self::Watchers => "watchers",
            Self::OpenIssues => "open_issues",
        }
    }

    /// The declared shape of this resource
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::FullName
            | Self::Name
            | Self::Description
            | Self::Homepage
            | Self::Language
            | Self::License
            | Self::DefaultBranch => ValueType::String,
            Self::Topics => ValueType::List,
            Self::Private | Self::Archived | Self::Disabled | Self::Fork => ValueType::Bool,
            Self::Stargazers | Self::Forks | Self::Watchers | Self::OpenIssues => {
                ValueType::Number
            }
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule as written in the rule file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    /// Unique rule name, used as the key in results and statistics
    pub name: String,

    pub action: Action,

    pub resource: Resource,

    /// Glob pattern for `match` and `exclude-match`
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Glob patterns exempting a repository from the rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Declared value shape; defaults to the resource's shape
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
}

impl RuleDefinition {
    /// Create a definition with no pattern, exclusions or declared type
    pub fn new(name: impl Into<String>, action: Action, resource: Resource) -> Self {
        Self {
            name: name.into(),
            action,
            resource,
            pattern: None,
            exclude: Vec::new(),
            value_type: None,
        }
    }

    /// Set the `match` pattern
    pub fn with_match(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Add an exclude pattern
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Declare the value type explicitly
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

/// Parse rule definitions from YAML text
pub fn parse_rules(content: &str, origin: &str) -> Result<Vec<RuleDefinition>, RepoAuditError> {
    // An empty document is an empty rule set
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_yaml::from_str(content).map_err(|e| {
        RepoAuditError::Config(ConfigError::Yaml {
            path: origin.to_string(),
            source: e,
        })
    })
}

/// Load rule definitions from a YAML file
pub fn load_rules(path: &Path) -> Result<Vec<RuleDefinition>, RepoAuditError> {
    let content = fs::read_to_string(path).map_err(|e| {
        RepoAuditError::Config(ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })
    })?;

    let rules = parse_rules(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), count = rules.len(), "Loaded rule definitions");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_yaml() {
        let yaml = r#"
- name: no-public
  action: forbid
  resource: visibility.private
  type: bool

- name: has-license
  action: require
  resource: license
  type: string
  exclude:
    - "org/legacy-*"

- name: described
  action: match
  resource: description
  match: "?*"
"#;
        let rules = parse_rules(yaml, "rules.yml").unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].action, Action::Forbid);
        assert_eq!(rules[0].resource, Resource::Private);
        assert_eq!(rules[0].value_type, Some(ValueType::Bool));
        assert_eq!(rules[1].exclude, vec!["org/legacy-*".to_string()]);
        assert_eq!(rules[2].pattern.as_deref(), Some("?*"));
        assert_eq!(rules[2].value_type, None);
    }

    #[test]
    fn test_resource_aliases() {
        let yaml = r#"
- { name: a, action: forbid, resource: private }
- { name: b, action: require, resource: stars }
- { name: c, action: require, resource: topics, type: list-of-string }
"#;
        let rules = parse_rules(yaml, "rules.yml").unwrap();
        assert_eq!(rules[0].resource, Resource::Private);
        assert_eq!(rules[1].resource, Resource::Stargazers);
        assert_eq!(rules[2].value_type, Some(ValueType::List));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let yaml = "- { name: a, action: ensure, resource: license }";
        let err = parse_rules(yaml, "rules.yml").unwrap_err();
        assert!(err.to_string().contains("rules.yml"));
    }

    #[test]
    fn test_unknown_resource_is_rejected() {
        let yaml = "- { name: a, action: require, resource: owner.email }";
        assert!(parse_rules(yaml, "rules.yml").is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let yaml = "- { name: a, action: require, resource: license, severity: high }";
        assert!(parse_rules(yaml, "rules.yml").is_err());
    }

    #[test]
    fn test_empty_document_is_empty_rule_set() {
        assert!(parse_rules("", "rules.yml").unwrap().is_empty());
        assert!(parse_rules("[]", "rules.yml").unwrap().is_empty());
    }

    #[test]
    fn test_resource_value_types() {
        assert_eq!(Resource::License.value_type(), ValueType::String);
        assert_eq!(Resource::Topics.value_type(), ValueType::List);
        assert_eq!(Resource::Archived.value_type(), ValueType::Bool);
        assert_eq!(Resource::OpenIssues.value_type(), ValueType::Number);
    }

    #[test]
    fn test_serialize_uses_file_names() {
        let rule = RuleDefinition::new("desc", Action::Match, Resource::Description)
            .with_match("*tool*")
            .with_type(ValueType::String);
        let yaml = serde_yaml::to_string(&rule).unwrap();

        assert!(yaml.contains("match: '*tool*'") || yaml.contains("match: \"*tool*\""));
        assert!(yaml.contains("type: string"));
        assert!(!yaml.contains("exclude"));
    }
}
