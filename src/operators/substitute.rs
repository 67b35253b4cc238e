use std::borrow::Cow;

use crate::ast::resolve_position;
use crate::interpreter::{Context, Transform};
use crate::pattern::Pattern;

pub struct Substitute {
    pattern: Pattern,
    replacement: String,
    global: bool,
}

impl Substitute {
    pub fn new(pattern: Pattern, replacement: String, global: bool) -> Self {
        Self {
            pattern,
            replacement,
            global,
        }
    }

    fn substitute_line(&self, line: String) -> String {
        let replaced = if self.global {
            self.pattern.replace_all(&line, &self.replacement)
        } else {
            self.pattern.replace_first(&line, &self.replacement)
        };
        match replaced {
            Cow::Borrowed(_) => line,
            Cow::Owned(s) => s,
        }
    }
}

impl Transform for Substitute {
    fn apply(&self, lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        lines
            .into_iter()
            .map(|line| self.substitute_line(line))
            .collect()
    }
}

/// Replaces the whole content of one line, addressed by 1-based or negative position.
pub struct LineSubstitute {
    line: i64,
    text: String,
}

impl LineSubstitute {
    pub fn new(line: i64, text: String) -> Self {
        Self { line, text }
    }
}

impl Transform for LineSubstitute {
    fn apply(&self, mut lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        if let Some(i) = resolve_position(self.line, lines.len()) {
            lines[i] = self.text.clone();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn substitute(pattern: &str, replacement: &str, global: bool) -> Substitute {
        Substitute::new(
            Pattern::from_regex(Regex::new(pattern).unwrap()),
            replacement.to_string(),
            global,
        )
    }

    #[test]
    fn replaces_first_match_only() {
        let result = substitute("hello", "hi", false)
            .apply(lines(&["hello hello world"]), &Context::default());
        assert_eq!(result, lines(&["hi hello world"]));
    }

    #[test]
    fn global_replaces_every_match() {
        let result = substitute("hello", "hi", true)
            .apply(lines(&["hello hello world"]), &Context::default());
        assert_eq!(result, lines(&["hi hi world"]));
    }

    #[test]
    fn non_matching_lines_unchanged() {
        let result = substitute("z", "y", true).apply(lines(&["abc", "def"]), &Context::default());
        assert_eq!(result, lines(&["abc", "def"]));
    }

    #[test]
    fn capture_groups() {
        let result = substitute(r"(\w+)=(\w+)", "$2=$1", false)
            .apply(lines(&["key=value"]), &Context::default());
        assert_eq!(result, lines(&["value=key"]));
    }

    #[test]
    fn empty_replacement_deletes_match() {
        let result = substitute("ERROR: ", "", false)
            .apply(lines(&["ERROR: disk full"]), &Context::default());
        assert_eq!(result, lines(&["disk full"]));
    }

    #[test]
    fn never_matching_pattern_is_identity() {
        let sub = Substitute::new(Pattern::never(), "x".to_string(), true);
        let result = sub.apply(lines(&["abc"]), &Context::default());
        assert_eq!(result, lines(&["abc"]));
    }

    #[test]
    fn line_substitute_replaces_one_line() {
        let result = LineSubstitute::new(2, "replaced".to_string())
            .apply(lines(&["line 1", "line 2", "line 3"]), &Context::default());
        assert_eq!(result, lines(&["line 1", "replaced", "line 3"]));
    }

    #[test]
    fn line_substitute_negative_position() {
        let result = LineSubstitute::new(-1, "last".to_string())
            .apply(lines(&["a", "b", "c"]), &Context::default());
        assert_eq!(result, lines(&["a", "b", "last"]));
    }

    #[test]
    fn line_substitute_out_of_range_is_noop() {
        let input = lines(&["a", "b"]);
        for line in [0, 3, -3] {
            let result = LineSubstitute::new(line, "x".to_string())
                .apply(input.clone(), &Context::default());
            assert_eq!(result, input);
        }
    }
}
