//! Glob patterns for `match` and `exclude`
//!
//! One dialect applies everywhere: shell-style globs compiled with `globset`.
//!
//! - matching is case-sensitive and anchored to the whole value
//! - `*` matches any run of characters, including `/`
//! - `?` matches one character, `[...]` a character class
//! - `{a,b}` matches either alternative
//! - `\` escapes the next character

use globset::{GlobBuilder, GlobMatcher};

/// A compiled glob pattern that remembers its source text
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    matcher: GlobMatcher,
}

impl Pattern {
    /// Compile a glob pattern
    pub fn new(source: &str) -> Result<Self, globset::Error> {
        let glob = GlobBuilder::new(source)
            .literal_separator(false)
            .backslash_escape(true)
            .build()?;

        Ok(Self {
            source: source.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// The pattern as written in the rule file
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether the pattern matches the whole value
    pub fn is_match(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }
}
