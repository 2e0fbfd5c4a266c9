//! Blocklist filter for challenge-mode template source.
//!
//! Every rule is removed case-insensitively in a single left-to-right pass over
//! the original input. The output is never re-scanned, so text that only forms
//! a blocked token once its neighbours are removed survives: `se__lf` becomes
//! `self`, and `{__%` becomes `{%`. That reassembly is the intended bypass
//! surface of the challenge and is covered by tests.

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Substrings removed from challenge-mode templates.
pub const DEFAULT_RULES: [&str; 16] = [
    "{%",
    "%}",
    "__",
    "self",
    "class",
    "mro",
    "subclasses",
    "globals",
    "builtins",
    "import",
    "popen",
    "subprocess",
    "config",
    "request",
    "eval",
    "exec",
];

/// An ordered, immutable set of blocked substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules(Vec<String>);

impl FilterRules {
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            rules
                .into_iter()
                .map(Into::<String>::into)
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    pub fn rules(&self) -> &[String] {
        &self.0
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

/// Compiled form of [`FilterRules`].
#[derive(Debug, Clone)]
pub struct InputFilter {
    rules: FilterRules,
    pattern: Option<Regex>,
}

impl InputFilter {
    /// Compiles `rules` into one case-insensitive alternation.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the combined pattern cannot be compiled
    pub fn new(rules: FilterRules) -> Result<Self> {
        if rules.rules().is_empty() {
            return Ok(Self {
                rules,
                pattern: None,
            });
        }
        // Alternation is leftmost-first; longer tokens win at the same offset.
        let mut tokens: Vec<&str> = rules
            .rules()
            .iter()
            .map(String::as_str)
            .collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::ConfigError(format!("invalid filter rules: {e}")))?;
        Ok(Self {
            rules,
            pattern: Some(pattern),
        })
    }

    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Removes every blocked substring from `input` in one pass.
    pub fn filter(&self, input: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return input.to_string();
        };
        let filtered = pattern.replace_all(input, "");
        if filtered.len() != input.len() {
            let removed = input.len() - filtered.len();
            debug!("Filter removed {removed} bytes from template");
        }
        filtered.into_owned()
    }

    /// Whether `input` contains any blocked substring.
    pub fn is_clean(&self, input: &str) -> bool {
        self.pattern.as_ref().map_or(true, |p| !p.is_match(input))
    }
}
