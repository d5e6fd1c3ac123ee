//! repoaudit library
//!
//! Audits every repository of a GitHub organization against a declarative
//! rule file, records a per-repository result for each rule, and aggregates
//! statistics over the run.
//!
//! ```rust
//! use chrono::Utc;
//! use repoaudit::audit::RepositorySnapshot;
//! use repoaudit::rules::{engine, Action, Resource, RuleDefinition};
//! use repoaudit::stats;
//!
//! let rules = vec![RuleDefinition::new("no-public", Action::Forbid, Resource::Private)];
//! let repos = vec![RepositorySnapshot::new("org/tool", Utc::now()).with_private(true)];
//!
//! let run = engine::run(&rules, repos).unwrap();
//! let stats = stats::aggregate(&run);
//! assert_eq!(stats.get("private"), 1);
//! assert_eq!(stats.get("no-public"), 0);
//! ```

pub mod appends;
pub mod audit;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod providers;
pub mod rules;
pub mod state;
pub mod stats;

pub use error::RepoAuditError;
