//! Operator implementations for the ssed language.
//!
//! Each rule kind compiles to a struct implementing `Transform`.

mod conditional;
mod document;
mod print;
mod status;
mod substitute;

pub use conditional::{Between, If};
pub use document::{Join, Reverse, Sort};
pub use print::{PrintByIndex, PrintByPattern};
pub use status::Status;
pub use substitute::{LineSubstitute, Substitute};

use crate::interpreter::{Context, Transform};

/// Identity operator - used for `print` and for rules that failed to parse.
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, lines: Vec<String>, _ctx: &Context) -> Vec<String> {
        lines
    }
}
