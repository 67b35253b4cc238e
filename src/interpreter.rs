//! Interpreter for the ssed rule language.
//!
//! A rule set is compiled into a pipeline of transforms. Each transform takes
//! the whole current line sequence and returns the next one, so per-line and
//! whole-document rules compose the same way.

use crate::ast::{self, DocumentOp};
use crate::error::Diagnostics;
use crate::operators::{
    Between, Identity, If, Join, LineSubstitute, PrintByIndex, PrintByPattern, Reverse, Sort,
    Status, Substitute,
};
use crate::parser;
use crate::pattern::Pattern;

/// A pipeline stage: converts the current line sequence into the next one.
pub trait Transform {
    /// Apply the transformation to a line sequence.
    fn apply(&self, lines: Vec<String>, ctx: &Context) -> Vec<String>;
}

/// Execution context shared by every stage of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Exit status of the previous external command, if any.
    status: Option<String>,
}

impl Context {
    pub fn new(status: Option<String>) -> Self {
        Self { status }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// A compiled rule set.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, each one consuming the previous stage's output.
    pub fn run(&self, lines: Vec<String>, ctx: &Context) -> Vec<String> {
        self.stages
            .iter()
            .fold(lines, |lines, stage| stage.apply(lines, ctx))
    }
}

/// Compile a rule set into a pipeline.
///
/// Invalid regexes are reported to `diagnostics` and compile to patterns that
/// never match; compilation itself cannot fail.
pub fn compile(rules: &ast::RuleSet, diagnostics: &mut dyn Diagnostics) -> Pipeline {
    Pipeline {
        stages: rules
            .rules
            .iter()
            .map(|rule| compile_rule(rule, diagnostics))
            .collect(),
    }
}

/// Compile a single rule into a stage.
fn compile_rule(rule: &ast::Rule, diagnostics: &mut dyn Diagnostics) -> Box<dyn Transform> {
    match rule {
        ast::Rule::Substitute {
            pattern,
            replacement,
            global,
        } => Box::new(Substitute::new(
            Pattern::compile(pattern, diagnostics),
            replacement.clone(),
            *global,
        )),
        ast::Rule::LineSubstitute { line, text } => {
            Box::new(LineSubstitute::new(*line, text.clone()))
        }
        ast::Rule::PrintByPattern { pattern } => Box::new(PrintByPattern::new(Pattern::compile(
            pattern,
            diagnostics,
        ))),
        ast::Rule::PrintByIndex(spec) => Box::new(PrintByIndex::new(*spec)),
        ast::Rule::PrintAll | ast::Rule::NoOp => Box::new(Identity),
        ast::Rule::Document(DocumentOp::Sort) => Box::new(Sort),
        ast::Rule::Document(DocumentOp::Reverse) => Box::new(Reverse),
        ast::Rule::Document(DocumentOp::Join) => Box::new(Join),
        ast::Rule::If { pattern, then } => Box::new(If::new(
            Pattern::compile(pattern, diagnostics),
            compile(then, diagnostics),
        )),
        ast::Rule::Between { start, end, inner } => Box::new(Between::new(
            Pattern::compile(start, diagnostics),
            Pattern::compile(end, diagnostics),
            compile(inner, diagnostics),
        )),
        ast::Rule::Status {
            code,
            then,
            otherwise,
        } => Box::new(Status::new(
            code.clone(),
            compile(then, diagnostics),
            compile(otherwise, diagnostics),
        )),
    }
}

/// Parse `rule_strings`, then run them over `lines`.
///
/// Never fails: malformed rules become no-ops and are reported to `diagnostics`.
pub fn execute<S: AsRef<str>>(
    rule_strings: &[S],
    lines: Vec<String>,
    status: Option<&str>,
    diagnostics: &mut dyn Diagnostics,
) -> Vec<String> {
    let rules = parser::parse_rule_set(rule_strings, diagnostics);
    let pipeline = compile(&rules, diagnostics);
    let ctx = Context::new(status.map(str::to_string));
    pipeline.run(lines, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Silent};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run_rules(rules: &[&str], input: &[&str]) -> Vec<String> {
        execute(rules, lines(input), None, &mut Silent)
    }

    #[test]
    fn empty_rule_set_is_identity() {
        let rules: [&str; 0] = [];
        assert_eq!(run_rules(&rules, &["a", "b"]), lines(&["a", "b"]));
    }

    #[test]
    fn substitute_first_match_per_line() {
        assert_eq!(
            run_rules(&["s/world/earth"], &["hello world", "bye world"]),
            lines(&["hello earth", "bye earth"])
        );
        assert_eq!(run_rules(&["s/o/0"], &["foo"]), lines(&["f0o"]));
    }

    #[test]
    fn substitute_global() {
        assert_eq!(
            run_rules(&["g/hello/hi"], &["hello hello world"]),
            lines(&["hi hi world"])
        );
    }

    #[test]
    fn print_matching_lines() {
        assert_eq!(
            run_rules(&["p/hello/"], &["hello", "world", "hello"]),
            lines(&["hello", "hello"])
        );
    }

    #[test]
    fn line_substitute() {
        assert_eq!(
            run_rules(&["s:2:replaced"], &["line 1", "line 2", "line 3"]),
            lines(&["line 1", "replaced", "line 3"])
        );
    }

    #[test]
    fn print_range() {
        assert_eq!(
            run_rules(&["p:2-4"], &["1", "2", "3", "4", "5"]),
            lines(&["2", "3", "4"])
        );
    }

    #[test]
    fn document_operations() {
        assert_eq!(run_rules(&["sort"], &["c", "a", "b"]), lines(&["a", "b", "c"]));
        assert_eq!(
            run_rules(&["reverse"], &["1", "2", "3"]),
            lines(&["3", "2", "1"])
        );
        assert_eq!(run_rules(&["join"], &["a", "b", "c"]), lines(&["a b c"]));
    }

    #[test]
    fn stages_feed_each_other() {
        assert_eq!(
            run_rules(&["p/a/", "sort", "p:-1"], &["ab", "c", "aa", "ba"]),
            lines(&["ba"])
        );
    }

    #[test]
    fn positions_use_current_sequence() {
        // After the filter only two lines remain, so line 2 is "c2".
        assert_eq!(
            run_rules(&["p/c/", "s:2:X"], &["a1", "c1", "b1", "c2"]),
            lines(&["c1", "X"])
        );
    }

    #[test]
    fn if_block() {
        assert_eq!(
            run_rules(&["if/hello/ { s/o/x }"], &["hello", "world", "hello"]),
            lines(&["hellx", "world", "hellx"])
        );
    }

    #[test]
    fn between_block() {
        assert_eq!(
            run_rules(&[r"between/start/end/ { s/\d/x }"], &["start", "1", "2", "end", "3"]),
            lines(&["start", "x", "x", "end", "3"])
        );
    }

    #[test]
    fn status_then_and_else() {
        let input = lines(&["line1", "line2", "line3"]);
        let rule = ["status:0 { print:-1 } else { print }"];

        let matched = execute(&rule, input.clone(), Some("0"), &mut Silent);
        assert_eq!(matched, lines(&["line3"]));

        let unmatched = execute(&rule, input, Some("1"), &mut Silent);
        assert_eq!(unmatched, lines(&["line1", "line2", "line3"]));
    }

    #[test]
    fn status_absent_runs_else() {
        assert_eq!(
            run_rules(&["status:0 { join } else { reverse }"], &["a", "b"]),
            lines(&["b", "a"])
        );
    }

    #[test]
    fn malformed_rules_are_noops() {
        let mut warnings: Vec<Error> = Vec::new();
        let out = execute(&["invalid/syntax", "s//"], lines(&["test"]), None, &mut warnings);
        assert_eq!(out, lines(&["test"]));
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].position.rule, Some(1));
        assert_eq!(warnings[1].position.rule, Some(2));
    }

    #[test]
    fn invalid_regex_warns_and_keeps_going() {
        let mut warnings: Vec<Error> = Vec::new();
        let out = execute(
            &["s/[oops/x", "s/a/b"],
            lines(&["[oops a"]),
            None,
            &mut warnings,
        );
        assert_eq!(out, lines(&["[oops b"]));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn invalid_filter_regex_drops_everything() {
        assert!(run_rules(&["p/(/"], &["(", "a"]).is_empty());
    }

    #[test]
    fn compile_counts_stages() {
        let rules = parser::parse_rule_set(&["sort", "bogus", "if/a/ { join }"], &mut Silent);
        let pipeline = compile(&rules, &mut Silent);
        assert_eq!(pipeline.len(), 3);
        assert!(!pipeline.is_empty());
    }

    #[test]
    fn sort_is_idempotent_and_reverse_is_involution() {
        let input = &["pear", "apple", "Zebra", "fig"];
        assert_eq!(
            run_rules(&["sort", "sort"], input),
            run_rules(&["sort"], input)
        );
        assert_eq!(run_rules(&["reverse", "reverse"], input), lines(input));
    }

    #[test]
    fn join_empty_input_yields_one_empty_line() {
        assert_eq!(run_rules(&["join"], &[]), lines(&[""]));
    }
}
