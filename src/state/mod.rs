//! Audit state persistence
//!
//! This module stores the latest [`AuditRun`] so that `stats`, `report` and
//! `compare` can work without re-fetching repositories.
//!
//! The on-disk format is pretty-printed JSON. Writes go to a temporary file in
//! the same directory and are renamed into place, so a failed save never
//! leaves a truncated state file behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::audit::AuditRun;
use crate::error::{RepoAuditError, StateError};

/// Default state file location, relative to the working directory
pub const DEFAULT_STATE_PATH: &str = ".repoaudit/audit.json";

/// Storage for audit runs
pub trait StateStore {
    /// Read the previously saved run
    fn load(&self) -> Result<AuditRun, RepoAuditError>;

    /// Persist a run, replacing any previous one
    fn save(&self, run: &AuditRun) -> Result<(), RepoAuditError>;
}

/// JSON file backed state store
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Create a store for `location`, resolved against `project_root`.
    ///
    /// Absolute paths are used as-is and `~/` expands to the home directory.
    pub fn new(project_root: &Path, location: impl AsRef<Path>) -> Self {
        Self {
            path: Self::resolve_path(project_root, location.as_ref()),
        }
    }

    fn resolve_path(project_root: &Path, location: &Path) -> PathBuf {
        if location.is_absolute() {
            return location.to_path_buf();
        }

        match (location.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => project_root.join(location),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<AuditRun, RepoAuditError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StateError::NotFound {
                    path: self.display(),
                }
                .into())
            }
            Err(e) => {
                return Err(StateError::Read {
                    path: self.display(),
                    source: e,
                }
                .into())
            }
        };

        let run: AuditRun = serde_json::from_str(&content).map_err(|e| StateError::Decode {
            path: self.display(),
            source: e,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            repositories = run.len(),
            created_at = %run.created_at(),
            "Loaded audit state"
        );
        Ok(run)
    }

    fn save(&self, run: &AuditRun) -> Result<(), RepoAuditError> {
        let write_err = |source: io::Error| StateError::Write {
            path: self.display(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let json = serde_json::to_string_pretty(run).map_err(StateError::Encode)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(
            path = %self.path.display(),
            repositories = run.len(),
            "Saved audit state"
        );
        Ok(())
    }
}
