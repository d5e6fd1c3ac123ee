//! GitHub provider - Lists repositories via the gh CLI

use std::process::Command;
use tracing::{debug, warn};

use super::{parse_repositories, RepositorySource};
use crate::audit::RepositorySnapshot;
use crate::error::{ProviderError, RepoAuditError};

/// GitHub provider for one organization or user
pub struct GitHubProvider {
    owner: String,
}

impl GitHubProvider {
    /// Create a provider listing the repositories of `owner`
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }

    /// Check if GitHub CLI is installed and authenticated
    pub fn is_available() -> bool {
        if which::which("gh").is_err() {
            return false;
        }

        Command::new("gh")
            .args(["auth", "status"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// REST endpoints tried in order: organization first, then user
    fn endpoints(&self) -> [String; 2] {
        [
            format!("orgs/{}/repos?per_page=100&type=all", self.owner),
            format!("users/{}/repos?per_page=100&type=all", self.owner),
        ]
    }

    /// Run `gh api --paginate` on an endpoint and return stdout
    fn api(&self, endpoint: &str) -> Result<Vec<u8>, ProviderError> {
        let output = Command::new("gh")
            .args(["api", "--paginate", endpoint])
            .output()
            .map_err(|_| ProviderError::CommandFailed {
                command: format!("gh api --paginate {}", endpoint),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::CommandFailed {
                command: format!("gh api --paginate {}: {}", endpoint, stderr.trim()),
            });
        }

        Ok(output.stdout)
    }
}

impl RepositorySource for GitHubProvider {
    fn name(&self) -> String {
        format!("github {}", self.owner)
    }

    fn fetch(&self) -> Result<Vec<RepositorySnapshot>, RepoAuditError> {
        if which::which("gh").is_err() {
            return Err(ProviderError::GhNotFound.into());
        }

        let [org_endpoint, user_endpoint] = self.endpoints();

        let stdout = match self.api(&org_endpoint) {
            Ok(stdout) => stdout,
            Err(e) => {
                warn!(owner = %self.owner, error = %e, "Organization listing failed, trying user");
                self.api(&user_endpoint)?
            }
        };

        let repos = parse_repositories(&stdout, "gh api")?;
        debug!(owner = %self.owner, count = repos.len(), "Fetched repositories");
        Ok(repos)
    }
}
