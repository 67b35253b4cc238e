//! Regex wrapper used by every pattern-driven rule.

use std::borrow::Cow;
use std::ops::Range;

use regex::Regex;

use crate::error::{Diagnostics, Error};

/// A compiled pattern. An invalid regex compiles to a pattern that never matches.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Option<Regex>,
}

impl Pattern {
    /// Compile `source`, reporting an invalid regex to `diagnostics`.
    pub fn compile(source: &str, diagnostics: &mut dyn Diagnostics) -> Self {
        match Regex::new(source) {
            Ok(regex) => Self { regex: Some(regex) },
            Err(e) => {
                diagnostics.warn(Error::new(format!(
                    "invalid regex '{}': {}",
                    source, e
                )));
                Self { regex: None }
            }
        }
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex: Some(regex) }
    }

    /// A pattern that matches nothing.
    pub fn never() -> Self {
        Self { regex: None }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(line))
    }

    /// Replace the first match. `$1` and `${name}` expand capture groups.
    pub fn replace_first<'a>(&self, line: &'a str, replacement: &str) -> Cow<'a, str> {
        match &self.regex {
            Some(r) => r.replace(line, replacement),
            None => Cow::Borrowed(line),
        }
    }

    /// Replace every non-overlapping match.
    pub fn replace_all<'a>(&self, line: &'a str, replacement: &str) -> Cow<'a, str> {
        match &self.regex {
            Some(r) => r.replace_all(line, replacement),
            None => Cow::Borrowed(line),
        }
    }

    /// Byte ranges of every non-empty match in `line`.
    pub fn find_spans(&self, line: &str) -> Vec<Range<usize>> {
        match &self.regex {
            Some(r) => r
                .find_iter(line)
                .filter(|m| !m.is_empty())
                .map(|m| m.range())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Silent;

    #[test]
    fn matches_line() {
        let p = Pattern::compile("^he", &mut Silent);
        assert!(p.is_match("hello"));
        assert!(!p.is_match("ahem"));
    }

    #[test]
    fn replace_first_only() {
        let p = Pattern::compile("o", &mut Silent);
        assert_eq!(p.replace_first("foo", "x"), "fxo");
    }

    #[test]
    fn replace_all_occurrences() {
        let p = Pattern::compile("o", &mut Silent);
        assert_eq!(p.replace_all("foo boo", "x"), "fxx bxx");
    }

    #[test]
    fn replace_with_capture_groups() {
        let p = Pattern::compile(r"(\w+) (\w+)", &mut Silent);
        assert_eq!(p.replace_first("hello world", "$2 $1"), "world hello");
    }

    #[test]
    fn invalid_regex_never_matches() {
        let mut warnings: Vec<Error> = Vec::new();
        let p = Pattern::compile("[invalid", &mut warnings);
        assert!(!p.is_match("[invalid"));
        assert_eq!(p.replace_all("abc", "x"), "abc");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("invalid regex '[invalid'"));
    }

    #[test]
    fn spans_skip_empty_matches() {
        let p = Pattern::compile("l*", &mut Silent);
        assert_eq!(p.find_spans("hello"), vec![2..4]);
    }
}
