use crate::ast::LineSpec;
use crate::interpreter::{Context, Transform};
use crate::pattern::Pattern;

/// Keeps only the lines matching a pattern.
pub struct PrintByPattern {
    pattern: Pattern,
}

impl PrintByPattern {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }
}

impl Transform for PrintByPattern {
    fn apply(&self, lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        lines
            .into_iter()
            .filter(|line| self.pattern.is_match(line))
            .collect()
    }
}

/// Keeps only the lines selected by position.
pub struct PrintByIndex {
    spec: LineSpec,
}

impl PrintByIndex {
    pub fn new(spec: LineSpec) -> Self {
        Self { spec }
    }
}

impl Transform for PrintByIndex {
    fn apply(&self, lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        // Resolved indices are always ascending and contiguous.
        let indices = self.spec.resolve(lines.len());
        match indices.first() {
            Some(&first) => lines
                .into_iter()
                .skip(first)
                .take(indices.len())
                .collect(),
            None => Vec::new(),
        }
    }
}
