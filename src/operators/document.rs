use crate::interpreter::{Context, Transform};

/// Sorts lines ascending by code point.
pub struct Sort;

impl Transform for Sort {
    fn apply(&self, mut lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        lines.sort();
        lines
    }
}

pub struct Reverse;

impl Transform for Reverse {
    fn apply(&self, mut lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        lines.reverse();
        lines
    }
}

/// Collapses the document into a single space-separated line.
///
/// An empty document becomes one empty line.
pub struct Join;

impl Transform for Join {
    fn apply(&self, lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        vec![lines.join(" ")]
    }
}
