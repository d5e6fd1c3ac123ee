//! Generate man page command

use clap::CommandFactory;
use std::fs;

use super::GenerateManArgs;
use crate::cli::{exit_codes, Cli};
use crate::error::RepoAuditError;

/// Execute the generate-man command
pub fn execute(args: GenerateManArgs) -> Result<i32, RepoAuditError> {
    let man = clap_mangen::Man::new(Cli::command());
    let output_path = args.output.join("repoaudit.1");
    let write_err = |source| RepoAuditError::Output {
        path: output_path.display().to_string(),
        source,
    };

    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer).map_err(write_err)?;
    fs::write(&output_path, buffer).map_err(write_err)?;

    println!("Man page generated: {}", output_path.display());

    Ok(exit_codes::SUCCESS)
}
