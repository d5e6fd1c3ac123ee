//! Init command - Write a starter configuration and rule file

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use std::fs;
use std::path::Path;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::config::{Config, CONFIG_FILENAME, SAMPLE_RULES};
use crate::providers::github::GitHubProvider;

pub fn execute(args: InitArgs) -> Result<i32> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        if args.non_interactive {
            eprintln!(
                "{} Configuration file already exists. Use --force to overwrite.",
                "Error:".red().bold()
            );
            return Ok(exit_codes::ERROR);
        }

        let overwrite = Confirm::new()
            .with_prompt("Configuration file already exists. Overwrite?")
            .default(false)
            .interact()?;

        if !overwrite {
            println!("{}", "Aborted.".yellow());
            return Ok(exit_codes::SUCCESS);
        }
    }

    let owner = match args.owner {
        Some(owner) => Some(owner),
        None if args.non_interactive => None,
        None => prompt_owner()?,
    };

    let config = Config {
        owner,
        ..Config::default()
    };

    let config_content = config.to_toml()?;
    fs::write(config_path, &config_content).context("Failed to write configuration file")?;

    println!(
        "{} Created {}",
        "Success:".green().bold(),
        CONFIG_FILENAME.cyan()
    );

    if config.rules.exists() {
        println!(
            "{} Keeping existing {}",
            "Note:".yellow().bold(),
            config.rules.display()
        );
    } else {
        fs::write(&config.rules, SAMPLE_RULES).with_context(|| {
            format!("Failed to write rule file {}", config.rules.display())
        })?;
        println!(
            "{} Created {} with sample rules",
            "Success:".green().bold(),
            config.rules.display().to_string().cyan()
        );
    }

    if !args.skip_checks && !GitHubProvider::is_available() {
        println!(
            "{} GitHub CLI (gh) is not installed or not authenticated; \
             set `repositories` to audit from a file instead",
            "Warning:".yellow().bold()
        );
    }

    println!("\nNext steps:");
    println!("  1. Review and customize {}", config.rules.display().to_string().cyan());
    println!("  2. Run {} to check the rules", "repoaudit validate".cyan());
    println!("  3. Run {} to audit your repositories", "repoaudit audit".cyan());

    Ok(exit_codes::SUCCESS)
}

fn prompt_owner() -> Result<Option<String>> {
    let owner: String = Input::new()
        .with_prompt("GitHub organization or user (leave empty to set later)")
        .allow_empty(true)
        .interact_text()?;

    let owner = owner.trim();
    Ok((!owner.is_empty()).then(|| owner.to_string()))
}
