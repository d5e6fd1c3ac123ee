//! Rules module - Rule definitions, evaluation and the audit engine

pub mod definition;
pub mod engine;
pub mod evaluator;
pub mod pattern;
pub mod results;

pub use definition::{load_rules, Action, Resource, RuleDefinition, ValueType};
pub use engine::{AuditEngine, RuleSet};
pub use evaluator::{evaluate, Rule};
pub use results::{RepositoryResults, RuleResult, RuleStatus};
