//! Error types for repoaudit
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.
//!
//! Rule evaluation problems for a single repository are not errors here: they are
//! recorded as [`crate::rules::RuleStatus::Error`] results and the audit continues.

use thiserror::Error;

/// Main error type for repoaudit
#[derive(Error, Debug)]
pub enum RepoAuditError {
    /// Configuration or rule file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid rule set or repository set, detected before evaluation
    #[error("Invalid rule set: {0}")]
    RuleSet(#[from] RuleSetError),

    /// Repository source errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Audit state persistence errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Failure writing command output
    #[error("Failed to write '{path}': {source}")]
    Output {
        /// Destination that could not be written
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors loading configuration, rule definitions or annotations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Failed to parse a YAML document (rules or appends)
    #[error("Failed to parse '{path}': {source}")]
    Yaml {
        /// Path to the YAML file
        path: String,
        /// The underlying parse error
        source: serde_yaml::Error,
    },

    /// A required setting is missing
    #[error("Missing setting '{key}' in configuration")]
    MissingSetting {
        /// The configuration key
        key: String,
    },
}

/// Rule set and repository set validation failures
#[derive(Error, Debug)]
pub enum RuleSetError {
    /// A rule has an empty name
    #[error("rule #{position} has an empty name")]
    EmptyName {
        /// 1-based position of the rule in the rule file
        position: usize,
    },

    /// Two rules share the same name
    #[error("duplicate rule name '{name}'")]
    DuplicateName {
        /// The repeated name
        name: String,
    },

    /// Declared type does not match the resource shape
    #[error("rule '{name}': type '{declared}' is incompatible with resource '{resource}' ({expected})")]
    TypeMismatch {
        /// Rule name
        name: String,
        /// Resource inspected by the rule
        resource: String,
        /// Type given in the rule
        declared: String,
        /// Type of the resource
        expected: String,
    },

    /// A match-style action without a pattern
    #[error("rule '{name}': action '{action}' requires a 'match' pattern")]
    MissingMatch {
        /// Rule name
        name: String,
        /// The action
        action: String,
    },

    /// A pattern that is not a valid glob
    #[error("rule '{name}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Rule name
        name: String,
        /// The offending pattern
        pattern: String,
        /// The underlying glob error
        source: globset::Error,
    },

    /// A rule name collides with a built-in statistic
    #[error("rule name '{name}' is reserved for a built-in statistic")]
    ReservedName {
        /// The reserved name
        name: String,
    },

    /// The repository source returned the same identity twice
    #[error("repository '{full_name}' appears more than once in the source")]
    DuplicateRepository {
        /// The repeated identity
        full_name: String,
    },
}

/// Errors from repository sources
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The GitHub CLI is not installed
    #[error("GitHub CLI (gh) not found in PATH")]
    GhNotFound,

    /// A command failed to run or exited unsuccessfully
    #[error("Command failed: {command}")]
    CommandFailed {
        /// The command that failed, with any stderr output
        command: String,
    },

    /// Failed to read a repository dump
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        /// Path to the file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The response could not be parsed
    #[error("Malformed repository data from {origin}: {source}")]
    Malformed {
        /// Where the data came from
        origin: String,
        /// The underlying parse error
        source: serde_json::Error,
    },
}

/// Errors loading or saving audit runs
#[derive(Error, Debug)]
pub enum StateError {
    /// No audit run has been saved at the path
    #[error("No audit state found at '{path}' (run `repoaudit audit` first)")]
    NotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to read the state file
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// Path to the state file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the state file
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// Path to the state file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The state file is not a valid audit run
    #[error("Invalid audit state in '{path}': {source}")]
    Decode {
        /// Path to the state file
        path: String,
        /// The underlying parse error
        source: serde_json::Error,
    },

    /// Failed to encode an audit run
    #[error("Failed to encode audit state: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<toml::de::Error> for RepoAuditError {
    fn from(err: toml::de::Error) -> Self {
        RepoAuditError::Config(ConfigError::Parse(err))
    }
}

impl From<toml::ser::Error> for RepoAuditError {
    fn from(err: toml::ser::Error) -> Self {
        RepoAuditError::Config(ConfigError::Serialize(err))
    }
}
