//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, RepoAuditError};
use crate::state::DEFAULT_STATE_PATH;

pub const CONFIG_FILENAME: &str = ".repoaudit.toml";

const DEFAULT_RULES_FILE: &str = "rules.yml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub organization or user whose repositories are audited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Rule definitions file (YAML)
    #[serde(default = "default_rules")]
    pub rules: PathBuf,

    /// Where the latest audit run is stored
    #[serde(default = "default_storage")]
    pub storage: String,

    /// Optional supplementary annotations file (YAML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appends: Option<PathBuf>,

    /// Read repositories from this JSON file instead of GitHub
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<PathBuf>,
}

fn default_rules() -> PathBuf {
    PathBuf::from(DEFAULT_RULES_FILE)
}

fn default_storage() -> String {
    DEFAULT_STATE_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: None,
            rules: default_rules(),
            storage: default_storage(),
            appends: None,
            repositories: None,
        }
    }
}

impl Config {
    /// Load configuration from the given file, or from `.repoaudit.toml` in the
    /// current directory if it exists, or fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, RepoAuditError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let config_path = Path::new(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, RepoAuditError> {
        let content = fs::read_to_string(path).map_err(|e| {
            RepoAuditError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        toml::from_str(&content).map_err(Into::into)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, RepoAuditError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }

    /// The configured owner, or an error naming the missing key
    pub fn require_owner(&self) -> Result<&str, RepoAuditError> {
        self.owner.as_deref().ok_or_else(|| {
            RepoAuditError::Config(ConfigError::MissingSetting {
                key: "owner".to_string(),
            })
        })
    }
}
