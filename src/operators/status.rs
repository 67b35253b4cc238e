use crate::interpreter::{Context, Pipeline, Transform};

/// Branches on the previous command's exit status, once per document.
pub struct Status {
    code: String,
    then: Pipeline,
    otherwise: Pipeline,
}

impl Status {
    pub fn new(code: String, then: Pipeline, otherwise: Pipeline) -> Self {
        Self {
            code,
            then,
            otherwise,
        }
    }
}

impl Transform for Status {
    fn apply(&self, lines: Vec<String>, ctx: &Context) -> Vec<String> {
        if status_matches(ctx.status(), &self.code) {
            self.then.run(lines, ctx)
        } else {
            self.otherwise.run(lines, ctx)
        }
    }
}

/// Compare a status against an expected code, textually or as integers.
///
/// A missing status matches nothing.
fn status_matches(actual: Option<&str>, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let (actual, expected) = (actual.trim(), expected.trim());
    if actual == expected {
        return true;
    }
    match (actual.parse::<i64>(), expected.parse::<i64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
