//! Line documents: loading input, rendering output, writing results back.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

/// An ordered sequence of lines, fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    pub lines: Vec<String>,
}

impl Document {
    /// Load input from stdin.
    pub fn from_stdin() -> io::Result<Self> {
        let stdin = io::stdin();
        Self::from_reader(stdin.lock())
    }

    /// Load input from a file.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Split on newlines. A trailing `\r` is stripped from each line and a
    /// final newline does not produce an extra empty line.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
        Ok(Self { lines })
    }

    /// Overwrite `path` with the lines joined by newlines.
    pub fn write_back(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.to_string())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl From<Vec<String>> for Document {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in &self.lines {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}
