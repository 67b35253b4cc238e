//! Colored output: paints the spans of printed lines that a rule matched on.

use std::ops::Range;

use yansi::Paint;

use crate::ast::{Rule, RuleSet};
use crate::error::Silent;
use crate::pattern::Pattern;

pub struct Highlighter {
    patterns: Vec<Pattern>,
}

impl Highlighter {
    /// Collect the selection patterns of `rules`, including those in nested blocks.
    pub fn new(rules: &RuleSet) -> Self {
        let mut sources = Vec::new();
        collect_patterns(rules, &mut sources);
        // Bad regexes were already reported when the pipeline was compiled.
        let patterns = sources
            .into_iter()
            .map(|source| Pattern::compile(source, &mut Silent))
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Paint every matched span. Overlapping matches are merged.
    pub fn paint(&self, line: &str) -> String {
        let mut spans: Vec<Range<usize>> = self
            .patterns
            .iter()
            .flat_map(|p| p.find_spans(line))
            .collect();
        if spans.is_empty() {
            return line.to_string();
        }
        spans.sort_by_key(|span| span.start);

        let mut result = String::with_capacity(line.len() + spans.len() * 12);
        let mut pos = 0;
        for span in spans {
            let start = span.start.max(pos);
            if start >= span.end {
                continue;
            }
            result.push_str(&line[pos..start]);
            result.push_str(&line[start..span.end].yellow().bold().to_string());
            pos = span.end;
        }
        result.push_str(&line[pos..]);
        result
    }
}

fn collect_patterns<'a>(rules: &'a RuleSet, out: &mut Vec<&'a str>) {
    for rule in &rules.rules {
        match rule {
            Rule::PrintByPattern { pattern } => out.push(pattern),
            Rule::If { pattern, then } => {
                out.push(pattern);
                collect_patterns(then, out);
            }
            Rule::Between { start, end, inner } => {
                out.push(start);
                out.push(end);
                collect_patterns(inner, out);
            }
            Rule::Status {
                then, otherwise, ..
            } => {
                collect_patterns(then, out);
                collect_patterns(otherwise, out);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_rule_set;

    fn highlighter(rules: &[&str]) -> Highlighter {
        Highlighter::new(&parse_rule_set(rules, &mut Silent))
    }

    fn strip_ansi(s: &str) -> String {
        let mut result = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    #[test]
    fn collects_nested_patterns() {
        let h = highlighter(&[
            "p/a/",
            "s/b/c",
            "status:0 { between/x/y/ { if/z/ { sort } } }",
        ]);
        assert_eq!(h.patterns.len(), 4);
    }

    #[test]
    fn substitutions_are_not_highlighted() {
        let h = highlighter(&["s/b/c", "sort"]);
        assert!(h.is_empty());
        assert_eq!(h.paint("abc"), "abc");
    }

    #[test]
    fn painting_preserves_text() {
        let h = highlighter(&["p/wor/", "if/o/ { print }"]);
        let painted = h.paint("hello world");
        assert_ne!(painted, "hello world");
        assert_eq!(strip_ansi(&painted), "hello world");
    }

    #[test]
    fn unmatched_line_is_unchanged() {
        let h = highlighter(&["p/zzz/"]);
        assert_eq!(h.paint("hello"), "hello");
    }
}
