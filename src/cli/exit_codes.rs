//! Exit codes for the CLI
//!
//! Standard exit codes used by repoaudit for CI/CD integration.
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Every rule passed or was not applicable |
//! | 1 | `RULE_FAILURES` | Rule failures | A repository failed a rule, or a comparison regressed |
//! | 2 | `EVALUATION_ERRORS` | Evaluation errors | A rule could not be evaluated, no failures |
//! | 3 | `ERROR` | Runtime error | Invalid rule file, `gh` missing, unreadable state |
//! | 4 | `INVALID_ARGS` | Invalid arguments | Unknown flag or format |

/// Command completed and nothing needs attention.
pub const SUCCESS: i32 = 0;

/// At least one rule failed, or `compare --fail-on-regression` found a regression.
pub const RULE_FAILURES: i32 = 1;

/// Some rules produced error results but none failed.
pub const EVALUATION_ERRORS: i32 = 2;

/// Configuration, source or state error that aborted the command.
pub const ERROR: i32 = 3;

/// Invalid command-line arguments.
pub const INVALID_ARGS: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [SUCCESS, RULE_FAILURES, EVALUATION_ERRORS, ERROR, INVALID_ARGS];
        for i in 0..codes.len() {
            for j in (i + 1)..codes.len() {
                assert_ne!(codes[i], codes[j]);
            }
        }
    }
}
