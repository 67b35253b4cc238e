//! ssed is a line-oriented text transformer driven by short rule-strings.
//!
//! | Rule | Effect |
//! |------|--------|
//! | `s/P/R`, `g/P/R` | replace the first (or every) match of `P` in each line |
//! | `s:N:TEXT` | replace line `N` |
//! | `p/P/`, `print/P/` | keep lines matching `P` |
//! | `p:N`, `p:-N`, `p:A-B`, `print:…` | keep lines by position |
//! | `print` | keep everything |
//! | `sort`, `reverse`, `join` | whole-document operations |
//! | `if/P/ { … }` | run rules on lines matching `P` |
//! | `between/S/E/ { … }` | run rules on lines between `S` and `E` |
//! | `status:C { … } else { … }` | branch on the previous command's exit status |
//!
//! Rules never abort a run: anything that fails to parse becomes a no-op and
//! is reported through a [`Diagnostics`] sink.

pub mod ast;
pub mod config;
pub mod document;
pub mod error;
pub mod highlight;
pub mod interpreter;
pub mod operators;
pub mod parser;
pub mod pattern;

pub use document::Document;
pub use error::{Diagnostics, Error, Silent};
pub use interpreter::execute;
