//! # Providers Module
//!
//! Repository sources: collaborators that return [`RepositorySnapshot`]s in a
//! stable fetch order.
//!
//! - [`github::GitHubProvider`] lists an organization's (or user's)
//!   repositories through the GitHub CLI (`gh api --paginate`). Transport and
//!   authentication are entirely handled by `gh`.
//! - [`file::FileSource`] reads a saved GitHub API response from disk, which is
//!   useful offline and in CI.
//!
//! Both parse the GitHub REST repository representation with
//! [`parse_repositories`].
//!
//! ## Examples
//!
//! ```rust,no_run
//! use repoaudit::providers::{github::GitHubProvider, RepositorySource};
//!
//! if GitHubProvider::is_available() {
//!     let provider = GitHubProvider::new("hashicorp");
//!     let repos = provider.fetch().unwrap();
//!     println!("{} repositories", repos.len());
//! }
//! ```

pub mod file;
pub mod github;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::audit::RepositorySnapshot;
use crate::error::{ProviderError, RepoAuditError};

/// A collaborator that lists repositories
pub trait RepositorySource {
    /// Short description used in logs
    fn name(&self) -> String;

    /// Fetch every repository, fully materialized, in a stable order
    fn fetch(&self) -> Result<Vec<RepositorySnapshot>, RepoAuditError>;
}

/// Repository as returned by the GitHub REST API
#[derive(Debug, Deserialize)]
struct ApiRepository {
    full_name: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    license: Option<ApiLicense>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiLicense {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    spdx_id: Option<String>,
}

impl ApiLicense {
    /// SPDX id, falling back to GitHub's license key for unrecognized licenses
    fn identifier(self) -> Option<String> {
        match self.spdx_id {
            Some(id) if !id.is_empty() && id != "NOASSERTION" => Some(id),
            _ => self.key,
        }
    }
}

impl From<ApiRepository> for RepositorySnapshot {
    fn from(repo: ApiRepository) -> Self {
        Self {
            full_name: repo.full_name,
            name: repo.name,
            description: repo.description,
            homepage: repo.homepage,
            language: repo.language,
            default_branch: repo.default_branch,
            topics: repo.topics,
            private: repo.private,
            archived: repo.archived,
            disabled: repo.disabled,
            fork: repo.fork,
            license: repo.license.and_then(ApiLicense::identifier),
            stargazers: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.watchers_count,
            open_issues: repo.open_issues_count,
            updated: repo.updated_at,
        }
    }
}

/// Parse GitHub REST repository JSON.
///
/// Accepts a single array, or several arrays back to back as printed by
/// `gh api --paginate`. Order is preserved.
pub fn parse_repositories(
    bytes: &[u8],
    origin: &str,
) -> Result<Vec<RepositorySnapshot>, ProviderError> {
    let mut repos = Vec::new();

    for page in serde_json::Deserializer::from_slice(bytes).into_iter::<Vec<ApiRepository>>() {
        let page = page.map_err(|e| ProviderError::Malformed {
            origin: origin.to_string(),
            source: e,
        })?;
        repos.extend(page.into_iter().map(RepositorySnapshot::from));
    }

    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"[
        {
            "full_name": "org/tool",
            "name": "tool",
            "description": null,
            "language": "Go",
            "topics": ["cli"],
            "private": true,
            "archived": false,
            "disabled": false,
            "fork": false,
            "license": {"key": "mpl-2.0", "spdx_id": "MPL-2.0", "name": "Mozilla Public License 2.0"},
            "stargazers_count": 12,
            "forks_count": 3,
            "watchers_count": 12,
            "open_issues_count": 1,
            "default_branch": "main",
            "updated_at": "2024-05-01T10:00:00Z",
            "owner": {"login": "org"}
        },
        {
            "full_name": "org/other",
            "name": "other",
            "license": {"key": "other", "spdx_id": "NOASSERTION"},
            "updated_at": "2023-01-01T00:00:00Z"
        }
    ]"#;

    #[test]
    fn test_parse_single_page() {
        let repos = parse_repositories(PAGE.as_bytes(), "test").unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].full_name, "org/tool");
        assert!(repos[0].private);
        assert!(repos[0].description.is_none());
        assert_eq!(repos[0].license.as_deref(), Some("MPL-2.0"));
        assert_eq!(repos[0].stargazers, 12);
        assert_eq!(repos[1].license.as_deref(), Some("other"));
    }

    #[test]
    fn test_parse_concatenated_pages_keeps_order() {
        let pages = r#"[{"full_name":"org/b","name":"b","updated_at":"2024-01-01T00:00:00Z"}]
[{"full_name":"org/a","name":"a","updated_at":"2024-01-01T00:00:00Z"}]"#;

        let repos = parse_repositories(pages.as_bytes(), "gh").unwrap();
        let names: Vec<_> = repos.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["org/b", "org/a"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_repositories(b"", "gh").unwrap().is_empty());
        assert!(parse_repositories(b"[]", "gh").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_repositories(b"{\"message\": \"Not Found\"}", "gh").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }
}
