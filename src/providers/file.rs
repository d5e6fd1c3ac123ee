//! File repository source - GitHub API repository JSON saved on disk

use std::fs;
use std::path::PathBuf;

use super::{parse_repositories, RepositorySource};
use crate::audit::RepositorySnapshot;
use crate::error::{ProviderError, RepoAuditError};

/// Reads repositories from a JSON dump, e.g.
/// `gh api --paginate orgs/<org>/repos > repos.json`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RepositorySource for FileSource {
    fn name(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<RepositorySnapshot>, RepoAuditError> {
        let bytes = fs::read(&self.path).map_err(|e| ProviderError::FileRead {
            path: self.path.display().to_string(),
            source: e,
        })?;

        Ok(parse_repositories(
            &bytes,
            &self.path.display().to_string(),
        )?)
    }
}
