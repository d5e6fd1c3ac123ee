//! Configuration module

pub mod loader;

pub use loader::{Config, CONFIG_FILENAME};

/// Starter rule file written by `repoaudit init`
pub const SAMPLE_RULES: &str = r#"# Rule definitions for repoaudit.
#
# action:   match | exclude-match | require | forbid
# resource: full_name, name, description, homepage, language, license,
#           default_branch, topics, visibility.private, visibility.archived,
#           visibility.disabled, visibility.fork, stargazers, forks,
#           watchers, open_issues
# type:     string | bool | list | number (optional, must fit the resource)
# match/exclude use glob patterns, matched case-sensitively against the
# whole value; exclude also matches the repository full name.

- name: no-public
  action: forbid
  resource: visibility.private
  type: bool

- name: has-license
  action: require
  resource: license
  type: string

- name: has-description
  action: require
  resource: description

- name: has-topics
  action: require
  resource: topics
"#;
