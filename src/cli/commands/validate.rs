//! Validate command - Check the rule file without fetching repositories

use colored::Colorize;
use std::path::Path;

use super::ValidateArgs;
use crate::cli::exit_codes;
use crate::config::Config;
use crate::error::RepoAuditError;
use crate::rules::definition::load_rules;
use crate::rules::RuleSet;

pub fn execute(args: ValidateArgs, config_path: Option<&Path>) -> Result<i32, RepoAuditError> {
    let config = Config::load_or_default(config_path)?;
    let rules_path = args.rules.unwrap_or(config.rules);

    let definitions = load_rules(&rules_path)?;
    let rule_set = RuleSet::compile(&definitions)?;

    println!(
        "{} {} rule(s) in {} are valid",
        "Success:".green().bold(),
        rule_set.len(),
        rules_path.display().to_string().cyan()
    );
    for rule in rule_set.rules() {
        println!(
            "  {} {} {}",
            rule.name.cyan(),
            rule.action.to_string().dimmed(),
            rule.resource
        );
    }

    Ok(exit_codes::SUCCESS)
}
