//! Supplementary repository annotations ("appends")
//!
//! An optional YAML list of entries keyed by repository `full_name`, each
//! carrying arbitrary extra fields:
//!
//! ```yaml
//! - name: org/tool
//!   owner: platform-team
//!   tier: 1
//! ```
//!
//! Annotations are informational. They are looked up while reporting but never
//! change audit results or statistics, and a repository without an entry is
//! not an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, RepoAuditError};

/// Extra metadata for one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Append {
    /// Repository identity (`owner/repo`)
    pub name: String,

    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_yaml::Value>,
}

/// The loaded annotation list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Appends {
    entries: Vec<Append>,
}

impl Appends {
    pub fn new(entries: Vec<Append>) -> Self {
        Self { entries }
    }

    /// Load annotations from a YAML file
    pub fn load(path: &Path) -> Result<Self, RepoAuditError> {
        let content = fs::read_to_string(path).map_err(|e| {
            RepoAuditError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let entries: Vec<Append> = serde_yaml::from_str(&content).map_err(|e| {
            RepoAuditError::Config(ConfigError::Yaml {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        tracing::debug!(path = %path.display(), count = entries.len(), "Loaded appends");
        Ok(Self { entries })
    }

    /// Load annotations if a path is configured
    pub fn load_optional(path: Option<&Path>) -> Result<Self, RepoAuditError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// All annotations for a repository
    pub fn for_repository<'a>(&'a self, full_name: &'a str) -> impl Iterator<Item = &'a Append> {
        self.entries.iter().filter(move |a| a.name == full_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
