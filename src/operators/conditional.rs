use crate::interpreter::{Context, Pipeline, Transform};
use crate::pattern::Pattern;

/// Runs a nested pipeline on each line that matches a pattern.
///
/// The nested pipeline sees a one-line document. Whatever it returns replaces
/// the line, so a nested filter can drop it.
pub struct If {
    pattern: Pattern,
    then: Pipeline,
}

impl If {
    pub fn new(pattern: Pattern, then: Pipeline) -> Self {
        Self { pattern, then }
    }
}

impl Transform for If {
    fn apply(&self, lines: Vec<String>, ctx: &Context) -> Vec<String> {
        let mut result = Vec::with_capacity(lines.len());
        for line in lines {
            if self.pattern.is_match(&line) {
                result.extend(self.then.run(vec![line], ctx));
            } else {
                result.push(line);
            }
        }
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    Outside,
    Inside,
}

/// Runs a nested pipeline on each line strictly between a start and an end match.
///
/// The boundary lines themselves pass through untouched. An unterminated block
/// runs to the end of the document.
pub struct Between {
    start: Pattern,
    end: Pattern,
    inner: Pipeline,
}

impl Between {
    pub fn new(start: Pattern, end: Pattern, inner: Pipeline) -> Self {
        Self { start, end, inner }
    }
}

impl Transform for Between {
    fn apply(&self, lines: Vec<String>, ctx: &Context) -> Vec<String> {
        let mut state = BlockState::Outside;
        let mut result = Vec::with_capacity(lines.len());

        for line in lines {
            match state {
                BlockState::Outside => {
                    if self.start.is_match(&line) {
                        state = BlockState::Inside;
                    }
                    result.push(line);
                }
                BlockState::Inside => {
                    if self.end.is_match(&line) {
                        state = BlockState::Outside;
                        result.push(line);
                    } else {
                        result.extend(self.inner.run(vec![line], ctx));
                    }
                }
            }
        }

        result
    }
}
