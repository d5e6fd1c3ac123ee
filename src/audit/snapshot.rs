//! Repository snapshots
//!
//! A [`RepositorySnapshot`] is a point-in-time record of the attributes of one
//! repository, as reported by a repository source. Snapshots are never updated:
//! each audit captures fresh ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable attributes of one repository at audit time.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use repoaudit::audit::RepositorySnapshot;
///
/// let repo = RepositorySnapshot::new("org/tool", Utc::now())
///     .with_description("Internal tooling")
///     .with_license("MIT")
///     .with_topics(["cli", "internal"]);
///
/// assert_eq!(repo.name, "tool");
/// assert!(!repo.private);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Identity of the repository (`owner/repo`)
    pub full_name: String,

    /// Repository name without the owner
    pub name: String,

    /// Repository description, if any
    #[serde(default)]
    pub description: Option<String>,

    /// Homepage URL, if any
    #[serde(default)]
    pub homepage: Option<String>,

    /// Primary language detected by the host
    #[serde(default)]
    pub language: Option<String>,

    /// Default branch name
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Repository topics
    #[serde(default)]
    pub topics: Vec<String>,

    /// Visibility flags
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub fork: bool,

    /// License identifier (SPDX id when known)
    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub stargazers: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub watchers: u64,
    #[serde(default)]
    pub open_issues: u64,

    /// Last time the repository was updated
    pub updated: DateTime<Utc>,
}

impl RepositorySnapshot {
    /// Create a snapshot with every optional attribute unset
    pub fn new(full_name: impl Into<String>, updated: DateTime<Utc>) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit_once('/')
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| full_name.clone());

        Self {
            full_name,
            name,
            description: None,
            homepage: None,
            language: None,
            default_branch: None,
            topics: Vec::new(),
            private: false,
            archived: false,
            disabled: false,
            fork: false,
            license: None,
            stargazers: 0,
            forks: 0,
            watchers: 0,
            open_issues: 0,
            updated,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the primary language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the license identifier
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Set the topics
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Set the private flag
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Set the archived flag
    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// Set the stargazer, fork and watcher counts
    pub fn with_counts(mut self, stargazers: u64, forks: u64, watchers: u64) -> Self {
        self.stargazers = stargazers;
        self.forks = forks;
        self.watchers = watchers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_derives_name_from_full_name() {
        let updated = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let repo = RepositorySnapshot::new("hashicorp/vault", updated);
        assert_eq!(repo.name, "vault");

        let bare = RepositorySnapshot::new("standalone", updated);
        assert_eq!(bare.name, "standalone");
    }

    #[test]
    fn test_deserialize_with_missing_optionals() {
        let json = r#"{"full_name":"org/a","name":"a","updated":"2024-03-01T12:00:00Z"}"#;
        let repo: RepositorySnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(repo.full_name, "org/a");
        assert!(repo.description.is_none());
        assert!(repo.topics.is_empty());
        assert_eq!(repo.stargazers, 0);
    }
}
