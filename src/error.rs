//! Error types and the diagnostics sink.
//!
//! Nothing in the engine is fatal: parse failures and bad patterns are
//! reported through a [`Diagnostics`] sink and the offending rule degrades
//! to a no-op.

use std::fmt;

/// Position information for error reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    /// Index of the rule-string (1-based) the error belongs to.
    pub rule: Option<usize>,
    /// Byte offset inside the rule-string.
    pub source_pos: Option<usize>,
}

impl Position {
    /// Create a position with source location.
    pub fn at_source(pos: usize) -> Self {
        Self {
            rule: None,
            source_pos: Some(pos),
        }
    }
}

/// A non-fatal problem found while parsing or compiling rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The error message.
    pub message: String,
    /// Position information for the error.
    pub position: Position,
}

impl Error {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: Position::default(),
        }
    }

    /// Create an error at a byte offset of a rule-string.
    pub fn at_source(message: impl Into<String>, pos: usize) -> Self {
        Self {
            message: message.into(),
            position: Position::at_source(pos),
        }
    }

    /// Attach the 1-based index of the rule-string.
    pub fn with_rule(mut self, rule: usize) -> Self {
        self.position.rule = Some(rule);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rule) = self.position.rule {
            write!(f, "rule {}: ", rule)?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Sink for non-fatal warnings. Never affects the produced lines.
pub trait Diagnostics {
    fn warn(&mut self, error: Error);
}

impl Diagnostics for Vec<Error> {
    fn warn(&mut self, error: Error) {
        self.push(error);
    }
}

/// Diagnostics sink that discards everything.
pub struct Silent;

impl Diagnostics for Silent {
    fn warn(&mut self, _error: Error) {}
}
